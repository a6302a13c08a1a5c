/// Read only view of whoever is signed in.
pub trait Identity {
    fn is_signed_in(&self) -> bool;

    fn display_name(&self) -> Option<String>;
}
