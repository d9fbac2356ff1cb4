//! quarry — a fluent SQL query builder for content collection stores.
//!
//! A collection is a named set of rows with a known shape, backed by a
//! physical table resolved through a [`Manifest`]. The builder accumulates
//! filters, projection, ordering, and pagination through chained calls,
//! compiles them into one SQL string, and delegates execution to an
//! injected [`Fetch`] collaborator. It never opens connections, runs SQL,
//! or caches results itself.
//!
//! See [`CollectionQuery`] for a full example.

pub mod error;
pub mod fetch;
pub mod manifest;
pub mod query;

pub use error::{BoxError, Error, Result};
pub use fetch::Fetch;
pub use manifest::Manifest;
pub use query::{CollectionQuery, Direction, FilterValue, Literal, Operator};

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde::Deserialize;
    use serde_json::{json, Value};

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Post {
        path: String,
        title: String,
    }

    /// Records every compiled query and replays canned rows.
    #[derive(Clone, Default)]
    struct RecordingFetch {
        queries: Arc<Mutex<Vec<String>>>,
        rows: Vec<Value>,
    }

    impl RecordingFetch {
        fn with_rows(rows: Vec<Value>) -> Self {
            Self {
                queries: Arc::default(),
                rows,
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }

        fn last_query(&self) -> String {
            self.queries().last().cloned().unwrap()
        }
    }

    impl Fetch for RecordingFetch {
        async fn fetch(
            &self,
            _collection: &str,
            sql: &str,
        ) -> std::result::Result<Vec<Value>, BoxError> {
            self.queries.lock().unwrap().push(sql.to_string());
            Ok(self.rows.clone())
        }
    }

    fn manifest() -> Arc<Manifest> {
        Arc::new([("posts", "_content_posts")].into_iter().collect())
    }

    fn query(fetch: &RecordingFetch) -> CollectionQuery<Post, RecordingFetch> {
        CollectionQuery::from("posts", manifest(), fetch.clone())
    }

    #[tokio::test]
    async fn end_to_end_compiles_the_full_query() {
        let fetch = RecordingFetch::default();
        query(&fetch)
            .path("/blog/post")
            .filter("draft", Operator::Eq, false)
            .unwrap()
            .order("date", Direction::Desc)
            .limit(5)
            .all()
            .await
            .unwrap();

        assert_eq!(
            fetch.last_query(),
            r#"SELECT * FROM _content_posts WHERE (("path" = '/blog/post')) AND (("draft" = 'false')) ORDER BY "date" DESC LIMIT 5"#
        );
    }

    #[tokio::test]
    async fn each_filter_contributes_one_parenthesized_clause() {
        let fetch = RecordingFetch::default();
        query(&fetch)
            .filter("a", Operator::Gt, 1)
            .unwrap()
            .filter("b", Operator::Like, "x")
            .unwrap()
            .filter("c", Operator::IsNull, ())
            .unwrap()
            .all()
            .await
            .unwrap();

        let sql = fetch.last_query();
        assert!(sql.contains(
            r#"WHERE (("a" > '1')) AND (("b" LIKE 'x')) AND (("c" IS NULL))"#
        ));
    }

    #[tokio::test]
    async fn in_filter_renders_list_and_rejects_scalars() {
        let fetch = RecordingFetch::default();
        query(&fetch)
            .filter("tag", Operator::In, vec!["a", "b"])
            .unwrap()
            .all()
            .await
            .unwrap();
        assert!(fetch.last_query().contains(r#"("tag" IN ('a', 'b'))"#));

        let err = query(&fetch)
            .filter("tag", Operator::In, "a")
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidInValue(Operator::In)));
        // The failed filter never produced a query.
        assert_eq!(fetch.queries().len(), 1);
    }

    #[tokio::test]
    async fn default_order_applies_when_no_order_was_chained() {
        let fetch = RecordingFetch::default();
        query(&fetch)
            .filter("draft", Operator::Eq, false)
            .unwrap()
            .limit(3)
            .all()
            .await
            .unwrap();

        assert!(fetch.last_query().contains("ORDER BY stem ASC LIMIT 3"));
    }

    #[tokio::test]
    async fn skip_without_limit_drops_the_offset() {
        let fetch = RecordingFetch::default();
        query(&fetch).skip(5).all().await.unwrap();
        assert_eq!(
            fetch.last_query(),
            "SELECT * FROM _content_posts ORDER BY stem ASC"
        );

        query(&fetch).skip(5).limit(10).all().await.unwrap();
        assert!(fetch.last_query().ends_with("LIMIT 10 OFFSET 5"));
    }

    #[tokio::test]
    async fn first_forces_limit_one_without_mutating_state() {
        let fetch = RecordingFetch::with_rows(vec![
            json!({"path": "/a", "title": "A"}),
            json!({"path": "/b", "title": "B"}),
        ]);
        let q = query(&fetch).limit(50);

        let first = q.first().await.unwrap();
        assert_eq!(
            first,
            Some(Post {
                path: "/a".into(),
                title: "A".into()
            })
        );
        assert!(fetch.last_query().ends_with("LIMIT 1"));

        // A later terminal call still sees the stored limit.
        q.all().await.unwrap();
        assert!(fetch.last_query().ends_with("LIMIT 50"));
    }

    #[tokio::test]
    async fn first_returns_none_on_empty_result() {
        let fetch = RecordingFetch::default();
        assert_eq!(query(&fetch).first().await.unwrap(), None);
    }

    #[tokio::test]
    async fn count_distinct_renders_aggregate_and_reads_count_column() {
        let fetch = RecordingFetch::with_rows(vec![json!({"count": 42})]);
        let total = query(&fetch).count_field("*", true).await.unwrap();

        assert_eq!(total, 42);
        assert!(fetch
            .last_query()
            .starts_with("SELECT COUNT(DISTINCT *) as count FROM _content_posts"));
    }

    #[tokio::test]
    async fn count_defaults_to_star_without_distinct() {
        let fetch = RecordingFetch::with_rows(vec![json!({"count": 7})]);
        let total = query(&fetch).count().await.unwrap();

        assert_eq!(total, 7);
        assert!(fetch
            .last_query()
            .starts_with("SELECT COUNT(*) as count FROM _content_posts"));
    }

    #[tokio::test]
    async fn count_with_malformed_row_errors() {
        let fetch = RecordingFetch::with_rows(vec![json!({"total": 7})]);
        let err = query(&fetch).count().await.unwrap_err();
        assert!(matches!(err, Error::MalformedCountRow));
    }

    #[tokio::test]
    async fn empty_select_call_is_a_noop() {
        let fetch = RecordingFetch::default();
        query(&fetch)
            .select(["a", "b"])
            .select(Vec::<String>::new())
            .all()
            .await
            .unwrap();

        assert!(fetch
            .last_query()
            .starts_with(r#"SELECT "a", "b" FROM _content_posts"#));
    }

    #[tokio::test]
    async fn unknown_collection_fails_before_fetching() {
        let fetch = RecordingFetch::default();
        let q: CollectionQuery<Post, _> =
            CollectionQuery::from("pages", manifest(), fetch.clone());

        let err = q.all().await.unwrap_err();
        assert!(matches!(err, Error::UnknownCollection(name) if name == "pages"));
        assert!(fetch.queries().is_empty());
    }

    #[tokio::test]
    async fn rows_deserialize_into_the_row_type() {
        let fetch = RecordingFetch::with_rows(vec![
            json!({"path": "/a", "title": "A"}),
            json!({"path": "/b", "title": "B"}),
        ]);
        let posts = query(&fetch).all().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].title, "B");
    }

    #[tokio::test]
    async fn fetch_errors_propagate_to_the_caller() {
        struct FailingFetch;

        impl Fetch for FailingFetch {
            async fn fetch(
                &self,
                _collection: &str,
                _sql: &str,
            ) -> std::result::Result<Vec<Value>, BoxError> {
                Err("connection reset".into())
            }
        }

        let q: CollectionQuery<Post, _> = CollectionQuery::from("posts", manifest(), FailingFetch);
        let err = q.all().await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
