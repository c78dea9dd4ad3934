//! Common small functions used throughout the crate
//!
//! These are left public for the convenience of the user, mostly for prettier
//! formatting of scientific numbers in summaries.

use std::fmt::LowerExp;

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Extends primitives with more specific formatting options
pub trait NumberFmt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// ```rust
    /// # use pbfhr::utils::NumberFmt;
    /// assert_eq!((2.55).sci(5, 2), "2.55000e+00".to_string());
    /// assert_eq!((-0.05).sci(3, 2), "-5.000e-02".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: LowerExp> NumberFmt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // `{:e}` output always contains an 'e'
        let exp = match num.find('e') {
            Some(idx) => num.split_off(idx),
            None => return num,
        };
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }
}

/// Number of equal divisions needed so no piece exceeds `max_size`
///
/// Always at least one division, so zero-length or degenerate inputs still map
/// onto a single cell.
///
/// ```rust
/// # use pbfhr::utils::divisions;
/// assert_eq!(divisions(4.0, 0.5), 8);
/// assert_eq!(divisions(0.05, 0.5), 1);
/// assert_eq!(divisions(1.0, 0.3), 4);
/// ```
pub fn divisions(length: f64, max_size: f64) -> usize {
    let n = (length / max_size - 1e-9).ceil();
    if n.is_finite() && n >= 1.0 {
        n as usize
    } else {
        1
    }
}

/// Build a 70 character banner for the command line tools
pub fn banner(title: &str) -> String {
    let mut s = f!("{:-<1$}\n", "", 70);
    s += &f!("{:^70}\n", title);
    s += &f!("{:-<1$}", "", 70);
    s
}

/// File path in the temporary directory, removed again when dropped
///
/// The process id is part of the name so concurrent test runs never share a
/// file.
#[cfg(test)]
pub(crate) struct TempPath(std::path::PathBuf);

#[cfg(test)]
impl TempPath {
    pub(crate) fn new(name: &str) -> Self {
        let name = f!("pbfhr_{}_{name}", std::process::id());
        let path = std::env::temp_dir().join(name);
        let _ = std::fs::remove_file(&path);
        Self(path)
    }
}

#[cfg(test)]
impl AsRef<std::path::Path> for TempPath {
    fn as_ref(&self) -> &std::path::Path {
        &self.0
    }
}

#[cfg(test)]
impl std::ops::Deref for TempPath {
    type Target = std::path::Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
impl Drop for TempPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, 0.25, 4)]
    #[case(1.0, 0.3, 4)]
    #[case(0.5, 1.0, 1)]
    #[case(0.0, 1.0, 1)]
    #[case(3.0000000001, 1.0, 3)]
    fn division_counts(#[case] length: f64, #[case] max_size: f64, #[case] expected: usize) {
        assert_eq!(divisions(length, max_size), expected);
    }

    #[test]
    fn banner_is_three_lines() {
        let b = banner("Pbfhr :: Test");
        assert_eq!(b.lines().count(), 3);
        assert!(b.lines().all(|l| l.len() == 70));
    }

    #[test]
    fn temp_path_is_removed_on_drop() {
        let path = TempPath::new("utils_drop.txt");
        std::fs::write(&path, "x").unwrap();
        let kept = path.to_path_buf();
        assert!(kept.exists());
        assert!(kept.to_string_lossy().contains(&std::process::id().to_string()));

        drop(path);
        assert!(!kept.exists());
    }
}
