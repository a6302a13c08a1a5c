use super::PendingAnswer;

#[derive(Debug)]
pub enum Action {
    AnswerRequest(PendingAnswer),
}
