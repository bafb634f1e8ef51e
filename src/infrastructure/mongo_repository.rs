// MongoDB repository implementation
use crate::application::trip_repository::TripRepository;
use crate::domain::error::{DashboardError, Result};
use crate::domain::pipeline::{Aggregate, GroupRecord, KeySource, PipelineSpec, SortRule};
use crate::domain::scalar::Scalar;
use crate::domain::trip::TripField;
use crate::infrastructure::config::DatastoreSettings;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Lazily opens the trip collection and hands out the same handle afterwards.
///
/// A failed attempt is not cached, so the next caller tries again.
pub struct ConnectionProvider {
    settings: DatastoreSettings,
    collection: OnceCell<Collection<Document>>,
}

impl ConnectionProvider {
    pub fn new(settings: DatastoreSettings) -> Self {
        Self {
            settings,
            collection: OnceCell::new(),
        }
    }

    pub async fn get_connection(&self) -> Result<&Collection<Document>> {
        self.collection.get_or_try_init(|| self.connect()).await
    }

    async fn connect(&self) -> Result<Collection<Document>> {
        let mut options = ClientOptions::parse(&self.settings.uri)
            .await
            .map_err(|e| DashboardError::Connection(e.to_string()))?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout =
            Some(Duration::from_secs(self.settings.server_selection_timeout_secs));

        let client = Client::with_options(options).map_err(|e| DashboardError::Connection(e.to_string()))?;
        let database = client.database(&self.settings.database);

        // The driver connects lazily; ping so an unreachable server fails here
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| DashboardError::Connection(e.to_string()))?;

        tracing::info!(
            "Connected to {}.{}",
            self.settings.database,
            self.settings.collection
        );
        Ok(database.collection::<Document>(&self.settings.collection))
    }
}

pub struct MongoRepository {
    provider: ConnectionProvider,
}

impl MongoRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TripRepository for MongoRepository {
    async fn estimated_trip_count(&self) -> Result<u64> {
        let collection = self.provider.get_connection().await?;
        collection
            .estimated_document_count()
            .await
            .map_err(query_error)
    }

    async fn aggregate(&self, pipeline: &PipelineSpec) -> Result<Vec<GroupRecord>> {
        let collection = self.provider.get_connection().await?;
        let stages = pipeline_stages(pipeline);
        tracing::debug!("Executing aggregation: {:?}", stages);

        let documents: Vec<Document> = collection
            .aggregate(stages)
            .await
            .map_err(query_error)?
            .try_collect()
            .await
            .map_err(query_error)?;

        documents.into_iter().map(to_group_record).collect()
    }
}

fn query_error(e: mongodb::error::Error) -> DashboardError {
    match *e.kind {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => DashboardError::Connection(e.to_string()),
        _ => DashboardError::Query(e.to_string()),
    }
}

fn field_path(field: TripField) -> String {
    format!("${}", field.document_key())
}

/// Translate a pipeline description into MongoDB aggregation stages
pub fn pipeline_stages(spec: &PipelineSpec) -> Vec<Document> {
    let mut stages = Vec::new();

    let derived = match spec.key {
        KeySource::HourOf(field) => Some(doc! { "$hour": field_path(field) }),
        KeySource::DayOfMonthOf(field) => Some(doc! { "$dayOfMonth": field_path(field) }),
        KeySource::All | KeySource::Field(_) => None,
    };

    let group_key = match spec.key {
        KeySource::All => Bson::Null,
        KeySource::Field(field) => Bson::String(field_path(field)),
        KeySource::HourOf(_) | KeySource::DayOfMonthOf(_) => Bson::String("$key".to_string()),
    };

    if let Some(expr) = derived {
        let mut projection = doc! { "key": expr };
        if let Aggregate::Avg(field) | Aggregate::Sum(field) = spec.aggregate {
            projection.insert(field.document_key(), 1);
        }
        stages.push(doc! { "$project": projection });
    }

    let accumulator = match spec.aggregate {
        Aggregate::Count => doc! { "$sum": 1 },
        Aggregate::Avg(field) => doc! { "$avg": field_path(field) },
        Aggregate::Sum(field) => doc! { "$sum": field_path(field) },
    };
    let mut group = doc! { "_id": group_key };
    group.insert(spec.metric, accumulator);
    stages.push(doc! { "$group": group });

    match spec.sort {
        SortRule::None => {}
        SortRule::KeyAscending => stages.push(doc! { "$sort": { "_id": 1 } }),
        SortRule::MetricDescending { limit } => {
            let mut order = Document::new();
            order.insert(spec.metric, -1);
            order.insert("_id", 1);
            stages.push(doc! { "$sort": order });
            stages.push(doc! { "$limit": limit as i64 });
        }
    }

    stages
}

fn to_group_record(document: Document) -> Result<GroupRecord> {
    let mut key = None;
    let mut metrics = Vec::new();

    for (name, value) in document {
        let value = to_scalar(value)?;
        if name == "_id" {
            key = Some(value);
        } else {
            metrics.push((name, value));
        }
    }

    let key = key.ok_or_else(|| DashboardError::MalformedRecord("group without _id".to_string()))?;
    Ok(GroupRecord::new(key, metrics))
}

fn to_scalar(value: Bson) -> Result<Scalar> {
    match value {
        Bson::Null | Bson::Undefined => Ok(Scalar::Null),
        Bson::Int32(i) => Ok(Scalar::Int(i as i64)),
        Bson::Int64(i) => Ok(Scalar::Int(i)),
        Bson::Double(f) => Ok(Scalar::Float(f)),
        Bson::String(s) => Ok(Scalar::Text(s)),
        other => Err(DashboardError::MalformedRecord(format!(
            "unsupported value {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::view::View;

    #[test]
    fn test_stages_for_derived_key() {
        let stages = pipeline_stages(&View::AvgDistanceByHour.spec().pipeline);
        assert_eq!(
            stages,
            vec![
                doc! { "$project": { "key": { "$hour": "$tpep_dropoff_datetime" }, "trip_distance": 1 } },
                doc! { "$group": { "_id": "$key", "avg_distance": { "$avg": "$trip_distance" } } },
                doc! { "$sort": { "_id": 1 } },
            ]
        );
    }

    #[test]
    fn test_stages_for_field_key() {
        let stages = pipeline_stages(&View::FareByPaymentType.spec().pipeline);
        assert_eq!(
            stages,
            vec![
                doc! { "$group": { "_id": "$payment_type", "total_fare": { "$sum": "$total_amount" } } },
                doc! { "$sort": { "_id": 1 } },
            ]
        );
    }

    #[test]
    fn test_stages_for_busiest_days() {
        let stages = pipeline_stages(&View::BusiestDays.spec().pipeline);
        assert_eq!(
            stages,
            vec![
                doc! { "$project": { "key": { "$dayOfMonth": "$tpep_pickup_datetime" } } },
                doc! { "$group": { "_id": "$key", "trips": { "$sum": 1 } } },
                doc! { "$sort": { "trips": -1, "_id": 1 } },
                doc! { "$limit": 10_i64 },
            ]
        );
    }

    #[test]
    fn test_stages_for_overall_average() {
        let stages = pipeline_stages(&PipelineSpec::overall_average(TripField::TotalAmount, "avg_fare"));
        assert_eq!(
            stages,
            vec![doc! { "$group": { "_id": Bson::Null, "avg_fare": { "$avg": "$total_amount" } } }]
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_fast_and_is_retried() {
        let provider = ConnectionProvider::new(DatastoreSettings {
            uri: "mongodb://127.0.0.1:1/".to_string(),
            server_selection_timeout_secs: 1,
            ..Default::default()
        });

        let first = provider.get_connection().await.unwrap_err();
        assert!(matches!(first, DashboardError::Connection(_)));

        // The failure is not cached; the second call attempts a new connection
        let second = provider.get_connection().await.unwrap_err();
        assert!(matches!(second, DashboardError::Connection(_)));
    }

    #[tokio::test]
    async fn test_repository_reports_connection_errors() {
        let repository = MongoRepository::new(ConnectionProvider::new(DatastoreSettings {
            uri: "mongodb://127.0.0.1:1/".to_string(),
            server_selection_timeout_secs: 1,
            ..Default::default()
        }));

        let err = repository.estimated_trip_count().await.unwrap_err();
        assert!(matches!(err, DashboardError::Connection(_)));
    }

    #[test]
    fn test_query_error_mapping() {
        let io = mongodb::error::Error::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(matches!(query_error(io), DashboardError::Connection(_)));
    }

    #[test]
    fn test_to_group_record() {
        let record = to_group_record(doc! { "_id": 3.0, "avg_distance": 2.5 }).unwrap();
        assert_eq!(record.key, Scalar::Float(3.0));
        assert_eq!(record.metric("avg_distance"), Some(&Scalar::Float(2.5)));

        let record = to_group_record(doc! { "_id": Bson::Null, "trips": 4_i32 }).unwrap();
        assert_eq!(record.key, Scalar::Null);
        assert_eq!(record.metric("trips"), Some(&Scalar::Int(4)));
    }

    #[test]
    fn test_to_group_record_requires_id() {
        let err = to_group_record(doc! { "trips": 4_i32 }).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedRecord(_)));
    }

    #[test]
    fn test_unsupported_bson_value() {
        let err = to_scalar(Bson::Array(vec![Bson::Int32(1)])).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedRecord(_)));
    }
}
