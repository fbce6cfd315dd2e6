/// Template variable `((name))`.
pub struct Variable;

impl Variable {
    pub const OPEN: &'static [u8; 2] = b"((";
    pub const CLOSE: &'static str = "))";

    pub fn is_valid_name(name: &str) -> bool {
        !name.trim().is_empty() && !name.contains(['(', ')', '\n']) && !name.contains("??")
    }
}
