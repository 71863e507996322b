//! Keypad encoding command.
//!
//! ```bash
//! hod encode "Tannenbaum"   # 8266362286
//! ```

use noahs_core::keypad;

/// Print `text` dialled on a phone keypad.
#[allow(clippy::print_stdout)]
pub fn run(text: &str) {
    println!("{}", keypad::encode(text));
}
