/// `**bold**`
pub struct Bold;

impl Bold {
    pub const DELIM: &'static [u8; 2] = b"**";
}

/// `_italic_`, with `*italic*` accepted on input.
pub struct Italic;

impl Italic {
    pub const UNDERSCORE: u8 = b'_';
    pub const STAR: u8 = b'*';
}
