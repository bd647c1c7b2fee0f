//! Lane selection encoded as a shareable location.
//!
//! Each lane contributes one `stack` query parameter, in lane order, so that
//! reopening the location restores the same comparison.

use url::form_urlencoded;
use url::Url;

use crate::stack::parse_lane_binding;
use crate::Stack;

pub const SELECTION_PARAM: &str = "stack";
const UNBOUND: &str = "none";

/// Serializes the lane selection as a query string (without the leading `?`).
pub fn encode_selection(selection: &[Option<Stack>]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for lane in selection {
        serializer.append_pair(SELECTION_PARAM, lane.map_or(UNBOUND, Stack::as_str));
    }
    serializer.finish()
}

/// Restores a selection from a query string or a full location.
///
/// `defaults` fixes the lane count; positions the query does not mention keep
/// their default, and surplus `stack` values are ignored.
pub fn decode_selection(location: &str, defaults: &[Option<Stack>]) -> Vec<Option<Stack>> {
    let query = extract_query(location);
    let mut selection = defaults.to_vec();
    let values = form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == SELECTION_PARAM)
        .map(|(_, value)| value.into_owned());
    for (slot, value) in selection.iter_mut().zip(values) {
        *slot = match parse_lane_binding(&value) {
            Ok(binding) => binding,
            Err(err) => {
                chat_logging::chat_warn!("Ignoring lane selection: {}", err);
                None
            }
        };
    }
    selection
}

/// Rewrites `page_url`'s query to an already encoded selection.
pub fn location_with_query(page_url: &str, query: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(page_url)?;
    url.set_query(Some(query));
    Ok(url.into())
}

fn extract_query(location: &str) -> &str {
    let trimmed = location.trim();
    let query = match trimmed.split_once('?') {
        Some((_, query)) => query,
        None => trimmed,
    };
    query.split('#').next().unwrap_or(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_one_param_per_lane() {
        let encoded = encode_selection(&[Some(Stack::OpenAi), None, Some(Stack::HydeGpt4)]);
        assert_eq!(encoded, "stack=openai&stack=none&stack=hyde-gpt4");
    }

    #[test]
    fn decode_reads_full_locations() {
        let defaults = [Some(Stack::Google), Some(Stack::Google)];
        let decoded = decode_selection(
            "http://localhost:8000/?stack=openai&stack=none#top",
            &defaults,
        );
        assert_eq!(decoded, vec![Some(Stack::OpenAi), None]);
    }

    #[test]
    fn decode_keeps_defaults_for_missing_lanes_and_drops_extras() {
        let defaults = [None, Some(Stack::Google)];
        assert_eq!(
            decode_selection("stack=openai", &defaults),
            vec![Some(Stack::OpenAi), Some(Stack::Google)]
        );
        assert_eq!(
            decode_selection("?stack=openai&stack=google&stack=hyde-gpt4", &defaults),
            vec![Some(Stack::OpenAi), Some(Stack::Google)]
        );
    }

    #[test]
    fn unknown_ids_unbind_the_lane() {
        assert_eq!(
            decode_selection("stack=bogus", &[Some(Stack::Google)]),
            vec![None]
        );
    }

    #[test]
    fn location_replaces_existing_query() {
        let location = location_with_query(
            "http://localhost:8000/chat?stack=google",
            &encode_selection(&[None]),
        )
        .unwrap();
        assert_eq!(location, "http://localhost:8000/chat?stack=none");
    }
}
