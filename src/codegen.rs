use crate::ast::Node;
/// Trait for generating an actual code
pub trait CodeGen
where
    Self: Sized,
{
    /// Error state for the codegen that contains all sort of errors.
    type Error;
    fn from_program(program: &[Node]) -> Result<Self, Self::Error>;
    fn to_text(&self) -> Vec<String>;
}
