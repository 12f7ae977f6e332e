//! <https://mimesniff.spec.whatwg.org/#parameters>

use std::borrow::Cow;

/// An insertion-ordered map from parameter name to parameter value.
///
/// Names are unique: [`Parameters::insert_if_absent`] silently ignores a
/// write for a name that is already present, matching the "first write
/// wins" behavior the parser relies on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters(Vec<(Cow<'static, [u8]>, Cow<'static, [u8]>)>);

impl Parameters {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, name: &[u8]) -> bool {
        self.0.iter().any(|(n, _)| n.as_ref() == name)
    }

    pub fn get(&self, name: &[u8]) -> Option<&[u8]> {
        self.0
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, v)| v.as_ref())
    }

    /// Inserts `(name, value)` unless `name` is already present. Returns
    /// `true` if the parameter was inserted.
    pub fn insert_if_absent(
        &mut self,
        name: impl Into<Cow<'static, [u8]>>,
        value: impl Into<Cow<'static, [u8]>>,
    ) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.0.push((name, value.into()));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.0.iter().map(|(n, v)| (n.as_ref(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_preserved() {
        let mut params = Parameters::new();
        params.insert_if_absent(&b"charset"[..], &b"utf-8"[..]);
        params.insert_if_absent(&b"boundary"[..], &b"xyz"[..]);

        let collected: Vec<_> = params.iter().collect();
        assert_eq!(
            collected,
            vec![(&b"charset"[..], &b"utf-8"[..]), (&b"boundary"[..], &b"xyz"[..])]
        );
    }

    #[test]
    fn first_write_wins() {
        let mut params = Parameters::new();
        assert!(params.insert_if_absent(&b"charset"[..], &b"utf-8"[..]));
        assert!(!params.insert_if_absent(&b"charset"[..], &b"iso-8859-1"[..]));
        assert_eq!(params.get(b"charset"), Some(&b"utf-8"[..]));
    }
}
