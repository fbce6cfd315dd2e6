/// `[text](href)`
pub struct Link;

impl Link {
    pub const OPEN: u8 = b'[';
    pub const MIDDLE: &'static str = "](";
    pub const CLOSE: char = ')';
}
