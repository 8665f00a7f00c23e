use serde::Deserialize;

/// Response body shape. Most endpoints wrap their payload as `{ "data": ... }`,
/// a few return it bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: i64,
    }

    #[test]
    fn test_wrapped_and_bare_bodies() {
        let wrapped: Envelope<Thing> = serde_json::from_str(r#"{"data": {"id": 1}}"#).unwrap();
        assert_eq!(wrapped.into_inner(), Thing { id: 1 });

        let bare: Envelope<Thing> = serde_json::from_str(r#"{"id": 2}"#).unwrap();
        assert_eq!(bare.into_inner(), Thing { id: 2 });

        let list: Envelope<Vec<Thing>> =
            serde_json::from_str(r#"{"success": true, "data": [{"id": 3}]}"#).unwrap();
        assert_eq!(list.into_inner().len(), 1);
    }
}
