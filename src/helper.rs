//! helper functions in this crate

use std::io::{Error, ErrorKind, Write};

/// Render a price the way the wire protocol expects: integral amounts keep
/// exactly one decimal ("10.0"), fractional amounts print shortest ("15.25").
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount == amount.trunc() {
        format!("{:.1}", amount)
    } else {
        format!("{}", amount)
    }
}

/// Write the whole response, looping over short writes. A `WouldBlock` mid-way
/// drops the remainder: each client gets a single bounded write per command.
pub fn write_response(stream: &mut impl Write, response: &[u8]) -> Result<usize, Error> {
    let mut response = response;
    let mut cnt = 0;
    loop {
        match stream.write(response) {
            Ok(len) => {
                response = &response[len..];
                cnt += len;
                if response.is_empty() {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                break;
            }
            Err(e) => {
                return Err(e);
            }
        }
    }
    Ok(cnt)
}
