use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` leaves untouched: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'!')
  .remove(b'~')
  .remove(b'*')
  .remove(b'\'')
  .remove(b'(')
  .remove(b')');

pub fn encode_uri_component(input: &str) -> String {
  utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Encodes every `/`-separated segment of `path` on its own, keeping the separators.
pub fn encode_path_segments(path: &str) -> String {
  path.split('/').map(encode_uri_component).collect::<Vec<_>>().join("/")
}

#[test]
fn test_encode_uri_component() {
  assert_eq!(encode_uri_component("app page.js"), "app%20page.js");
  assert_eq!(encode_uri_component("[id]"), "%5Bid%5D");
  assert_eq!(encode_uri_component("a-b_c.d!~*'()"), "a-b_c.d!~*'()");
  assert_eq!(encode_uri_component("ü"), "%C3%BC");
}

#[test]
fn test_encode_path_segments() {
  assert_eq!(encode_path_segments("static/chunks/[root] page.js"), "static/chunks/%5Broot%5D%20page.js");
  assert_eq!(encode_path_segments("/leading"), "/leading");
}
