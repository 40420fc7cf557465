//! Migration payload compiler
//!
//! Turns the records of a dataset into submission payloads for the target
//! system, following the declared types of an inferred schema. Media assets
//! are downloaded through an [`AssetFetcher`] and attached to the payload.

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{CompileError, CompileResult};
use super::fetcher::{AssetFetcher, resolve_asset_url};
use super::payload::{
    Attachment, CompiledPayloads, CompiledRecord, EntityPayloads, FieldPartition, Payload,
    relation_placeholder,
};
use crate::editor::TypeChange;
use crate::inference::{MediaAsset, validate_media};
use crate::models::{Dataset, EntitySchema, Record, ReservedFields, Schema};

/// Records of one entity compiled at the same time by default
pub const DEFAULT_MAX_CONCURRENT_RECORDS: usize = 8;

fn default_max_concurrent_records() -> usize {
    DEFAULT_MAX_CONCURRENT_RECORDS
}

/// Configuration for payload compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileConfig {
    /// Field names excluded from payloads
    #[serde(default)]
    pub reserved: ReservedFields,
    /// Base URL that relative asset URLs are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_base_url: Option<String>,
    /// Upper bound on records of one entity compiled concurrently
    #[serde(default = "default_max_concurrent_records")]
    pub max_concurrent_records: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            reserved: ReservedFields::default(),
            asset_base_url: None,
            max_concurrent_records: DEFAULT_MAX_CONCURRENT_RECORDS,
        }
    }
}

impl CompileConfig {
    /// Create a builder
    pub fn builder() -> CompileConfigBuilder {
        CompileConfigBuilder::default()
    }
}

/// Builder for [`CompileConfig`]
#[derive(Debug, Clone, Default)]
pub struct CompileConfigBuilder {
    config: CompileConfig,
}

impl CompileConfigBuilder {
    /// Set the reserved field names
    pub fn reserved(mut self, reserved: ReservedFields) -> Self {
        self.config.reserved = reserved;
        self
    }

    /// Set the base URL for relative asset URLs
    pub fn asset_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.asset_base_url = Some(url.into());
        self
    }

    /// Set how many records may be compiled at once (at least 1)
    pub fn max_concurrent_records(mut self, limit: usize) -> Self {
        self.config.max_concurrent_records = limit.max(1);
        self
    }

    pub fn build(self) -> CompileConfig {
        self.config
    }
}

/// Insert a key into payload data, warning when it replaces an earlier value
fn write_key(data: &mut Map<String, Value>, source: &str, key: &str, value: Value) {
    if let Some(previous) = data.insert(key.to_string(), value) {
        tracing::warn!(
            "Field '{}' overwrites payload key '{}' (previous value {})",
            source,
            key,
            previous
        );
    }
}

/// Compiles dataset records into submission payloads
pub struct PayloadCompiler<F: AssetFetcher> {
    fetcher: F,
    config: CompileConfig,
}

impl<F: AssetFetcher> PayloadCompiler<F> {
    /// Create a compiler with the default configuration
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            config: CompileConfig::default(),
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: CompileConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Compile every record of every schema entity
    ///
    /// Records are compiled concurrently, at most
    /// `max_concurrent_records` at a time. A record whose media cannot be
    /// validated or fetched is reported as failed in the result; the other
    /// records are unaffected.
    pub async fn compile(&self, schema: &Schema, dataset: &Dataset) -> CompiledPayloads {
        let mut entities = Vec::with_capacity(schema.len());

        for entity in &schema.entities {
            let Some(records) = dataset.records(&entity.name) else {
                tracing::warn!("Entity '{}' has no records in the dataset, skipping", entity.name);
                continue;
            };
            entities.push(self.compile_entity(entity, records).await);
        }

        let compiled = CompiledPayloads { entities };
        let failed = compiled.failures().len();
        if failed > 0 {
            tracing::warn!("{} record(s) failed to compile", failed);
        }
        tracing::info!("Compiled {} payload(s)", compiled.compiled_count());
        compiled
    }

    /// Compile the records of one entity
    pub async fn compile_entity(&self, entity: &EntitySchema, records: &[Record]) -> EntityPayloads {
        let partition = FieldPartition::of(entity, &self.config.reserved);
        let limit = self.config.max_concurrent_records.max(1);
        tracing::debug!(
            "Compiling {} record(s) of '{}' ({} media field(s), {} at a time)",
            records.len(),
            entity.name,
            partition.media.len(),
            limit
        );

        let partition = &partition;
        let records = stream::iter(records.iter().enumerate())
            .map(move |(index, record)| async move {
                let outcome = self.compile_record(partition, record).await;
                if let Err(e) = &outcome {
                    tracing::warn!("Record {} of '{}' failed: {}", index, entity.name, e);
                }
                CompiledRecord { index, outcome }
            })
            .buffered(limit)
            .collect::<Vec<_>>()
            .await;

        EntityPayloads {
            entity: entity.name.clone(),
            records,
        }
    }

    /// Compile one record
    pub async fn compile_record(
        &self,
        partition: &FieldPartition<'_>,
        record: &Record,
    ) -> CompileResult<Payload> {
        let data = self.compile_data(partition, record);

        // Validate every media value before any download starts
        let mut assets = Vec::new();
        for field in &partition.media {
            match record.get(&field.name) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    let asset = validate_media(value).map_err(|reason| CompileError::InvalidMedia {
                        field: field.name.clone(),
                        reason,
                    })?;
                    assets.push((field.name.as_str(), asset));
                }
            }
        }

        let files = join_all(assets.into_iter().map(|(field, asset)| self.attach(field, asset)))
            .await
            .into_iter()
            .collect::<CompileResult<Vec<_>>>()?;

        Ok(Payload { data, files })
    }

    /// Build the JSON `data` part of a record's payload
    ///
    /// Keys are written in partition order: plain, boolean, component
    /// sub-fields, relation placeholders. A later key replaces an earlier one
    /// of the same name, with a warning.
    pub fn compile_data(&self, partition: &FieldPartition<'_>, record: &Record) -> Map<String, Value> {
        let mut data = Map::new();

        for field in &partition.plain {
            if let Some(Value::String(s)) = record.get(&field.name) {
                data.insert(field.name.clone(), Value::String(s.clone()));
            }
        }

        for field in &partition.boolean {
            if let Some(Value::Bool(b)) = record.get(&field.name) {
                data.insert(field.name.clone(), Value::String(b.to_string()));
            }
        }

        for field in &partition.component {
            if let Some(Value::Object(object)) = record.get(&field.name) {
                for (key, value) in object {
                    if !self.config.reserved.is_reserved_sub_field(key) {
                        write_key(&mut data, &field.name, key, value.clone());
                    }
                }
            }
        }

        for field in &partition.relation {
            write_key(&mut data, &field.name, &field.name, relation_placeholder());
        }

        data
    }

    /// Bring the compiled payloads of a changed entity in line with the schema
    ///
    /// `schema` must already carry the change. Payload data is rebuilt from
    /// the source records, attachments of the changed field are dropped and
    /// records that failed are compiled again, so the result matches a fresh
    /// compile.
    pub async fn apply_type_change(
        &self,
        compiled: &mut CompiledPayloads,
        schema: &Schema,
        dataset: &Dataset,
        change: &TypeChange,
    ) {
        let (Some(entity), Some(records)) =
            (schema.entity(&change.entity), dataset.records(&change.entity))
        else {
            return;
        };
        let Some(payloads) = compiled
            .entities
            .iter_mut()
            .find(|e| e.entity == change.entity)
        else {
            return;
        };

        let partition = FieldPartition::of(entity, &self.config.reserved);
        tracing::debug!(
            "Updating {} payload(s) of '{}' after '{}' became {}",
            payloads.records.len(),
            change.entity,
            change.field(),
            change.current.field_type
        );

        for compiled_record in &mut payloads.records {
            let Some(record) = records.get(compiled_record.index) else {
                continue;
            };
            if let Ok(payload) = &mut compiled_record.outcome {
                payload.data = self.compile_data(&partition, record);
                payload.files.retain(|a| a.field != change.field());
                continue;
            }
            compiled_record.outcome = self.compile_record(&partition, record).await;
        }
    }

    async fn attach(&self, field: &str, asset: MediaAsset) -> CompileResult<Attachment> {
        let url = resolve_asset_url(self.config.asset_base_url.as_deref(), &asset.url);
        let fetched = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|source| CompileError::MediaFetch {
                field: field.to_string(),
                url: url.clone(),
                source,
            })?;

        let mime = match fetched.content_type {
            Some(content_type) if asset.mime.is_empty() => content_type,
            _ => asset.mime,
        };

        Ok(Attachment {
            field: field.to_string(),
            file_name: asset.name,
            mime,
            bytes: fetched.bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::super::error::FetchError;
    use super::super::fetcher::FetchedAsset;
    use super::super::fetcher::mock::MockAssetFetcher;
    use super::*;
    use crate::inference::SchemaBuilder;
    use crate::inference::fixtures::media_asset;
    use crate::editor::change_field_type;
    use crate::models::{Field, FieldType};

    fn posts_dataset(records: Value) -> Dataset {
        Dataset::from_value(json!({ "posts": records })).unwrap()
    }

    fn posts_schema(fields: Vec<Field>) -> Schema {
        let mut entity = EntitySchema::new("posts");
        entity.fields = fields;
        let mut schema = Schema::new();
        schema.insert_entity(entity);
        schema
    }

    #[tokio::test]
    async fn test_compile_plain_and_boolean_fields() {
        let schema = posts_schema(vec![
            Field::new("id", FieldType::String),
            Field::new("title", FieldType::String),
            Field::new("publishedOn", FieldType::Date),
            Field::new("views", FieldType::Number),
            Field::new("featured", FieldType::Boolean),
        ]);
        let dataset = posts_dataset(json!([{
            "id": "1",
            "title": "Hello",
            "publishedOn": "2021-03-04",
            "views": 3,
            "featured": true
        }]));

        let compiled = PayloadCompiler::new(MockAssetFetcher::new())
            .compile(&schema, &dataset)
            .await;
        let payload = compiled.entity("posts").unwrap().records[0].payload().unwrap();

        assert_eq!(
            Value::Object(payload.data.clone()),
            json!({"title": "Hello", "featured": "true"})
        );
        assert!(!payload.data.contains_key("publishedOn"));
        assert!(!payload.data.contains_key("views"));
        assert!(payload.files.is_empty());
    }

    #[tokio::test]
    async fn test_compile_flattens_components() {
        let schema = posts_schema(vec![
            Field::new("title", FieldType::String),
            Field::new("social", FieldType::Component).with_sub_fields(vec![
                Field::new("facebook", FieldType::String),
                Field::new("twitter", FieldType::String),
            ]),
        ]);
        let dataset = posts_dataset(json!([{
            "title": "Hello",
            "social": {"id": "c1", "_id": "c1", "facebook": "fb", "twitter": "tw"}
        }]));

        let compiled = PayloadCompiler::new(MockAssetFetcher::new())
            .compile(&schema, &dataset)
            .await;
        let payload = compiled.entity("posts").unwrap().records[0].payload().unwrap();

        assert_eq!(
            Value::Object(payload.data.clone()),
            json!({"title": "Hello", "facebook": "fb", "twitter": "tw"})
        );
    }

    #[tokio::test]
    async fn test_component_key_collision_keeps_later_writer() {
        let schema = posts_schema(vec![
            Field::new("name", FieldType::String),
            Field::new("author", FieldType::Component)
                .with_sub_fields(vec![Field::new("name", FieldType::String)]),
        ]);
        let dataset = posts_dataset(json!([{"name": "Top", "author": {"id": "1", "name": "Ann"}}]));

        let compiled = PayloadCompiler::new(MockAssetFetcher::new())
            .compile(&schema, &dataset)
            .await;
        let payload = compiled.entity("posts").unwrap().records[0].payload().unwrap();
        assert_eq!(Value::Object(payload.data.clone()), json!({"name": "Ann"}));
    }

    #[tokio::test]
    async fn test_compile_relation_placeholder() {
        let schema = posts_schema(vec![Field::relation("author")]);
        let dataset = posts_dataset(json!([{"author": {"id": "a1", "name": "Ann"}}, {}]));

        let compiled = PayloadCompiler::new(MockAssetFetcher::new())
            .compile(&schema, &dataset)
            .await;
        for record in &compiled.entity("posts").unwrap().records {
            assert_eq!(record.payload().unwrap().data["author"], json!({"id": null}));
        }
    }

    #[tokio::test]
    async fn test_compile_attaches_media() {
        let schema = posts_schema(vec![Field::new("cover", FieldType::Media)]);
        let dataset = posts_dataset(json!([
            {"cover": media_asset("cover.png", "/uploads/cover.png")},
            {"cover": null}
        ]));
        let fetcher =
            MockAssetFetcher::new().with_asset("http://source:1337/uploads/cover.png", b"png");
        let config = CompileConfig::builder()
            .asset_base_url("http://source:1337")
            .build();

        let compiler = PayloadCompiler::new(fetcher).with_config(config);
        let compiled = compiler.compile(&schema, &dataset).await;
        let records = &compiled.entity("posts").unwrap().records;

        let attachment = records[0].payload().unwrap().file("cover").unwrap();
        assert_eq!(attachment.file_name, "cover.png");
        assert_eq!(attachment.mime, "image/png");
        assert_eq!(attachment.form_key(), "files.cover");
        assert_eq!(attachment.bytes, b"png".to_vec());

        assert!(records[1].payload().unwrap().files.is_empty());
        assert_eq!(compiler.fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_fails_only_that_record() {
        let schema = posts_schema(vec![
            Field::new("title", FieldType::String),
            Field::new("cover", FieldType::Media),
        ]);
        let dataset = posts_dataset(json!([
            {"title": "a", "cover": media_asset("a.png", "http://x/a.png")},
            {"title": "b", "cover": media_asset("b.png", "http://x/missing.png")}
        ]));
        let fetcher = MockAssetFetcher::new().with_asset("http://x/a.png", b"a");

        let compiled = PayloadCompiler::new(fetcher).compile(&schema, &dataset).await;
        let records = &compiled.entity("posts").unwrap().records;

        assert!(records[0].payload().unwrap().file("cover").is_some());
        match &records[1].outcome {
            Err(CompileError::MediaFetch { field, url, source }) => {
                assert_eq!(field, "cover");
                assert_eq!(url, "http://x/missing.png");
                assert!(matches!(source, FetchError::Status { status: 404, .. }));
            }
            other => panic!("expected media fetch failure, got {:?}", other),
        }
        assert_eq!(compiled.failures().len(), 1);
        assert!(compiled.into_complete().is_err());
    }

    #[tokio::test]
    async fn test_invalid_media_value_fails_record() {
        let schema = posts_schema(vec![Field::new("cover", FieldType::Media)]);
        let dataset = posts_dataset(json!([{"cover": {"url": "/uploads/a.png"}}]));

        let compiled = PayloadCompiler::new(MockAssetFetcher::new())
            .compile(&schema, &dataset)
            .await;
        let record = &compiled.entity("posts").unwrap().records[0];
        assert!(matches!(
            record.outcome,
            Err(CompileError::InvalidMedia { .. })
        ));
    }

    #[tokio::test]
    async fn test_entity_missing_from_dataset_is_skipped() {
        let schema = posts_schema(vec![Field::new("title", FieldType::String)]);
        let dataset = Dataset::from_value(json!({"pages": [{"title": "x"}]})).unwrap();

        let compiled = PayloadCompiler::new(MockAssetFetcher::new())
            .compile(&schema, &dataset)
            .await;
        assert!(compiled.entities.is_empty());
    }

    #[tokio::test]
    async fn test_compile_inferred_schema() {
        let raw = json!({
            "posts": [
                {"id": "1", "title": "Hello", "body": "<p>x</p>", "cover": media_asset("c.png", "http://x/c.png")},
                {"id": "2", "title": "World", "body": "plain", "cover": null}
            ]
        });
        let schema = SchemaBuilder::new().build_value(&raw).unwrap();
        let dataset = Dataset::from_value(raw).unwrap();
        let fetcher = MockAssetFetcher::new().with_asset("http://x/c.png", b"c");

        let compiled = PayloadCompiler::new(fetcher).compile(&schema, &dataset).await;
        let payloads = compiled.into_complete().unwrap();
        assert_eq!(payloads.len(), 1);

        let (entity, payloads) = &payloads[0];
        assert_eq!(entity, "posts");
        assert_eq!(payloads[0].data["body"], json!("<p>x</p>"));
        assert!(payloads[0].file("cover").is_some());
        assert!(!payloads[1].data.contains_key("id"));
    }

    /// Counts fetches running at the same time
    #[derive(Default)]
    struct GaugedFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl AssetFetcher for GaugedFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedAsset, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(FetchedAsset::new(url.as_bytes().to_vec()))
        }
    }

    fn gallery_dataset(count: usize) -> Dataset {
        let records: Vec<Value> = (0..count)
            .map(|i| json!({"cover": media_asset(&format!("{i}.png"), &format!("http://x/{i}.png"))}))
            .collect();
        posts_dataset(Value::Array(records))
    }

    #[tokio::test]
    async fn test_record_concurrency_is_bounded() {
        let schema = posts_schema(vec![Field::new("cover", FieldType::Media)]);
        let dataset = gallery_dataset(6);

        for limit in [1, 2] {
            let config = CompileConfig::builder().max_concurrent_records(limit).build();
            let compiler = PayloadCompiler::new(GaugedFetcher::default()).with_config(config);
            let compiled = compiler.compile(&schema, &dataset).await;

            assert!(compiler.fetcher.peak.load(Ordering::SeqCst) <= limit);
            let records = &compiled.entity("posts").unwrap().records;
            for (i, record) in records.iter().enumerate() {
                assert_eq!(record.index, i);
                let attachment = record.payload().unwrap().file("cover").unwrap();
                assert_eq!(attachment.bytes, format!("http://x/{i}.png").into_bytes());
            }
        }
    }

    #[test]
    fn test_max_concurrent_records_config() {
        assert_eq!(
            CompileConfig::default().max_concurrent_records,
            DEFAULT_MAX_CONCURRENT_RECORDS
        );
        let config = CompileConfig::builder().max_concurrent_records(0).build();
        assert_eq!(config.max_concurrent_records, 1);

        let parsed: CompileConfig = serde_json::from_value(json!({"assetBaseUrl": "http://x"})).unwrap();
        assert_eq!(parsed.max_concurrent_records, DEFAULT_MAX_CONCURRENT_RECORDS);
    }

    #[tokio::test]
    async fn test_type_change_keeps_plain_field_sharing_sub_field_name() {
        let mut schema = posts_schema(vec![
            Field::new("name", FieldType::String),
            Field::new("author", FieldType::Component).with_sub_fields(vec![
                Field::new("id", FieldType::String),
                Field::new("name", FieldType::String),
            ]),
        ]);
        let dataset = posts_dataset(json!([{"name": "Top", "author": {"id": "1", "name": "Ann"}}]));
        let compiler = PayloadCompiler::new(MockAssetFetcher::new());

        let mut compiled = compiler.compile(&schema, &dataset).await;
        let change =
            change_field_type(&mut schema, "posts", "author", FieldType::RelationOneToOne).unwrap();
        compiler
            .apply_type_change(&mut compiled, &schema, &dataset, &change)
            .await;

        let recompiled = compiler.compile(&schema, &dataset).await;
        assert_eq!(compiled, recompiled);
        let payload = compiled.entity("posts").unwrap().records[0].payload().unwrap();
        assert_eq!(
            Value::Object(payload.data.clone()),
            json!({"name": "Top", "author": {"id": null}})
        );
    }

    #[tokio::test]
    async fn test_type_change_drops_attachment_and_retries_failed_records() {
        let mut schema = posts_schema(vec![
            Field::new("title", FieldType::String),
            Field::new("cover", FieldType::Media),
        ]);
        let dataset = posts_dataset(json!([
            {"title": "a", "cover": media_asset("a.png", "http://x/a.png")},
            {"title": "b", "cover": media_asset("b.png", "http://x/missing.png")}
        ]));
        let compiler =
            PayloadCompiler::new(MockAssetFetcher::new().with_asset("http://x/a.png", b"a"));

        let mut compiled = compiler.compile(&schema, &dataset).await;
        assert_eq!(compiled.failures().len(), 1);

        let change =
            change_field_type(&mut schema, "posts", "cover", FieldType::RelationOneToOne).unwrap();
        compiler
            .apply_type_change(&mut compiled, &schema, &dataset, &change)
            .await;

        assert!(compiled.failures().is_empty());
        assert_eq!(compiled, compiler.compile(&schema, &dataset).await);
        for record in &compiled.entity("posts").unwrap().records {
            let payload = record.payload().unwrap();
            assert!(payload.file("cover").is_none());
            assert_eq!(payload.data["cover"], relation_placeholder());
        }
    }
}
