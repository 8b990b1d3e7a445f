use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::{AttributeValue, KeySchemaElement, KeyType};
use aws_sdk_dynamodb::Client;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::store::{KeySchema, Row, ScanPage, ScanRequest, StoreError, TableStore};

/// Error codes DynamoDB returns when the credentials themselves are bad
const CREDENTIAL_ERROR_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "MissingAuthenticationTokenException",
    "ExpiredTokenException",
    "IncompleteSignatureException",
];

/// Handle to a DynamoDB table with its key schema already resolved
#[derive(Clone)]
pub struct DynamoTable {
    client: Client,
    table_name: String,
    region: String,
    key_schema: KeySchema,
}

impl DynamoTable {
    /// Build a client from `config` and look up the table's key schema
    #[instrument(skip(config), fields(table = %config.table_name, region = %config.region))]
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            debug!("Using static credentials from configuration");
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "temperature-table-tools",
            ));
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            debug!("Using endpoint override {}", endpoint_url);
            loader = loader.endpoint_url(endpoint_url);
        }

        let client = Client::new(&loader.load().await);

        let output = client
            .describe_table()
            .table_name(&config.table_name)
            .send()
            .await
            .map_err(|e| classify("DescribeTable", &config.table_name, e))?;
        let elements = output
            .table()
            .map(|table| table.key_schema())
            .unwrap_or_default();
        let key_schema = key_schema_from(&config.table_name, elements)?;

        info!(
            "Connected to table {} (key: {:?})",
            config.table_name,
            key_schema.attribute_names()
        );

        Ok(Self {
            client,
            table_name: config.table_name.clone(),
            region: config.region.clone(),
            key_schema,
        })
    }
}

#[async_trait]
impl TableStore for DynamoTable {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn key_schema(&self) -> &KeySchema {
        &self.key_schema
    }

    #[instrument(skip(self, request, start_key), fields(table = %self.table_name))]
    async fn scan_page(
        &self,
        request: &ScanRequest,
        start_key: Option<Row>,
    ) -> Result<ScanPage, StoreError> {
        let expressions = ScanExpressions::build(request);

        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_projection_expression(expressions.projection)
            .set_filter_expression(expressions.filter)
            .set_expression_attribute_names(expressions.names)
            .set_expression_attribute_values(expressions.values)
            .set_exclusive_start_key(start_key)
            .set_limit(
                request
                    .page_size
                    .map(|n| i32::try_from(n).unwrap_or(i32::MAX)),
            )
            .send()
            .await
            .map_err(|e| classify("Scan", &self.table_name, e))?;

        Ok(ScanPage {
            rows: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key,
        })
    }

    #[instrument(skip(self, key), fields(table = %self.table_name))]
    async fn delete_row(&self, key: Row) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| StoreError::RemoteWrite(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

/// Expression strings and placeholders for a Scan call
#[derive(Debug, Default, PartialEq)]
struct ScanExpressions {
    projection: Option<String>,
    filter: Option<String>,
    names: Option<HashMap<String, String>>,
    values: Option<HashMap<String, AttributeValue>>,
}

impl ScanExpressions {
    // Attribute names go through placeholders so reserved words are safe to use
    fn build(request: &ScanRequest) -> Self {
        let mut names = HashMap::new();
        let mut values = HashMap::new();

        let projection = request.projection.as_ref().map(|attributes| {
            attributes
                .iter()
                .enumerate()
                .map(|(i, attribute)| {
                    let placeholder = format!("#p{i}");
                    names.insert(placeholder.clone(), attribute.clone());
                    placeholder
                })
                .collect::<Vec<_>>()
                .join(", ")
        });

        let filter = request.filter.as_ref().map(|filter| {
            names.insert("#f".to_string(), filter.attribute.clone());
            values.insert(":f".to_string(), filter.value.clone());
            "#f = :f".to_string()
        });

        Self {
            projection,
            filter,
            names: (!names.is_empty()).then_some(names),
            values: (!values.is_empty()).then_some(values),
        }
    }
}

fn key_schema_from(
    table_name: &str,
    elements: &[KeySchemaElement],
) -> Result<KeySchema, StoreError> {
    let attribute_for = |key_type: KeyType| {
        elements
            .iter()
            .find(|element| *element.key_type() == key_type)
            .map(|element| element.attribute_name().to_string())
    };

    let partition_key = attribute_for(KeyType::Hash)
        .ok_or_else(|| StoreError::InvalidTable(table_name.to_string()))?;
    Ok(KeySchema::new(partition_key, attribute_for(KeyType::Range)))
}

/// Map an SDK failure onto the store's error taxonomy
fn classify<E, R>(operation: &'static str, table_name: &str, err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) | SdkError::ResponseError(_) => {
            StoreError::Connection(message)
        }
        _ => match err.code() {
            Some("ResourceNotFoundException") => {
                StoreError::NotFound(format!("{table_name}: {message}"))
            }
            Some("AccessDeniedException") => {
                StoreError::Authorization(format!("{table_name}: {message}"))
            }
            Some(code) if CREDENTIAL_ERROR_CODES.contains(&code) => StoreError::Connection(message),
            _ => StoreError::Service { operation, message },
        },
    }
}
