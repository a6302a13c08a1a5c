#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }
        let prefix = args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_clear()
            || cmd.is_speak()
            || cmd.is_pause()
            || cmd.is_resume()
            || cmd.is_listen()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return ["/cl", "/clear"].contains(&self.command.as_str());
    }

    pub fn is_speak(&self) -> bool {
        return ["/s", "/speak"].contains(&self.command.as_str());
    }

    pub fn is_pause(&self) -> bool {
        return self.command == "/pause";
    }

    pub fn is_resume(&self) -> bool {
        return self.command == "/resume";
    }

    pub fn is_listen(&self) -> bool {
        return ["/l", "/listen"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    /// The 1-based position argument passed to `/speak`, if any.
    pub fn position(&self) -> Option<Result<usize, String>> {
        let arg = self.args.first()?;
        match arg.parse::<usize>() {
            Ok(idx) if idx > 0 => return Some(Ok(idx)),
            _ => return Some(Err(format!("{arg} is not a valid message number."))),
        }
    }
}
