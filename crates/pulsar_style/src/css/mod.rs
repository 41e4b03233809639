//! Build css rules and stylesheets
//!
//! Every type in here is total. Malformed input is dropped rather than reported, rendering always
//! yields valid, possibly empty, css.

pub mod declarations;
pub mod generator;
pub mod preset;
pub mod rule;
pub mod sanitize;

/// Render a value as a css string
pub trait ToCss {
    /// Convert the value to a css string
    fn to_css(&self) -> String;
}

/// Check if a string is valid css
#[cfg(test)]
#[expect(clippy::panic, clippy::expect_used, reason = "This is meant for tests")]
pub(crate) fn assert_valid_css(string: &str) {
    let warnings = std::sync::Arc::default();
    let result = lightningcss::stylesheet::StyleSheet::parse(
        string,
        lightningcss::stylesheet::ParserOptions {
            warnings: Some(std::sync::Arc::clone(&warnings)),
            error_recovery: false,
            ..Default::default()
        },
    );

    match result {
        Err(error) => {
            panic!("The following code was not valid css\n{string}\nerror: {error}");
        }

        Ok(_) => {
            let warnings = warnings.read().expect("Failed to get lock");
            if !warnings.is_empty() {
                for warning in warnings.iter() {
                    eprintln!("{warning}");
                }
                panic!("The following code produced warnings\n{string}");
            }
        }
    }
}
