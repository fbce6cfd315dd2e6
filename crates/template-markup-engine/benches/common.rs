// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_template_content(size: usize) -> String {
    let base = "# Hello ((first_name))\n\nYour order ((order_id)) has shipped. ((vip??Thanks for being a **VIP** member.))\n\n((has_tracking??\nTrack it [here](https://example.com/track).\n\n- Carrier: ((carrier))\n- ETA: ((eta))\n))\n\n[[fr]]\nBonjour ((first_name))\n[[/fr]]\n\n^ Quoted reply\n\n";
    base.repeat(size)
}
