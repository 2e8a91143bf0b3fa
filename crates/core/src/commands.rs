//! Workflow command emission.
//!
//! Lines on stdout matching `::name::value` are interpreted by the hosting
//! runner as control commands. Untrusted issue text echoed into the log could
//! therefore inject commands; [`suppress_log_commands`] closes that hole for
//! the remainder of the run.

/// Stop the runner from interpreting workflow commands in subsequent output.
/// Returns the token that would resume processing.
pub fn suppress_log_commands() -> String {
    let token = format!("{:032x}", rand::random::<u128>());
    println!("::stop-commands::{token}");
    token
}

/// Mark the run as failed for the hosting process. The runner surfaces the
/// message as an error annotation and records a failing outcome.
pub fn fail_with(message: &str) {
    println!("::error::{}", escape_data(message));
}

fn escape_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::{escape_data, suppress_log_commands};

    #[test]
    fn test_escape_data() {
        let cases: &[(&str, &str)] = &[
            ("plain", "plain"),
            ("50% done", "50%25 done"),
            ("line1\nline2", "line1%0Aline2"),
            ("a\r\nb", "a%0D%0Ab"),
            ("100%\n", "100%25%0A"),
        ];
        for &(input, expected) in cases {
            assert_eq!(escape_data(input), expected, "{input:?}");
        }
    }

    #[test]
    fn test_suppress_token_shape() {
        let token = suppress_log_commands();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
