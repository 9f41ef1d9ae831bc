//! Raw query-string parsing for the service handlers.
//!
//! `prefixes` and `starting_by` repeat on the wire (`?prefixes=a&prefixes=b`
//! keeps segment order), so handlers parse the raw query instead of a
//! single-valued form extractor.

use url::form_urlencoded;

/// Decoded query pairs, in wire order.
pub(crate) struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub(crate) fn parse(raw: Option<&str>) -> QueryParams {
        let pairs = form_urlencoded::parse(raw.unwrap_or("").as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        QueryParams { pairs }
    }

    /// First value for a name, if any.
    pub(crate) fn one(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All values for a name, in wire order.
    pub(crate) fn all(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Boolean flag. Absent means `default`; "true"/"1" are true, anything
    /// else is false.
    pub(crate) fn flag(&self, name: &str, default: bool) -> bool {
        match self.one(name) {
            Some(v) => v == "true" || v == "1",
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_keep_wire_order() {
        let params = QueryParams::parse(Some("prefixes=b&prefixes=a&key=k1"));
        assert_eq!(params.all("prefixes"), vec!["b", "a"]);
        assert_eq!(params.one("key"), Some("k1"));
        assert!(params.all("starting_by").is_empty());
    }

    #[test]
    fn values_are_percent_decoded() {
        let params = QueryParams::parse(Some("key=a%20b&prefixes=%7B"));
        assert_eq!(params.one("key"), Some("a b"));
        assert_eq!(params.all("prefixes"), vec!["{"]);
    }

    #[test]
    fn empty_value_is_kept() {
        let params = QueryParams::parse(Some("prefixes=&prefixes=x"));
        assert_eq!(params.all("prefixes"), vec!["", "x"]);
    }

    #[test]
    fn flags_parse_true_one_and_default() {
        let params = QueryParams::parse(Some("a=true&b=1&c=false&d=no"));
        assert!(params.flag("a", false));
        assert!(params.flag("b", false));
        assert!(!params.flag("c", true));
        assert!(!params.flag("d", true));
        assert!(params.flag("missing", true));
        assert!(!params.flag("missing", false));
    }

    #[test]
    fn no_query_string_at_all() {
        let params = QueryParams::parse(None);
        assert_eq!(params.one("dbpath"), None);
    }
}
