//! Service configuration, read once at startup and passed around explicitly

use std::{env, fmt};

use anyhow::Context;
use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_credential_types::Credentials;
use tracing::Level;

use super::Environment;

const DEFAULT_REGION: &str = "eu-west-1";
const DEFAULT_BUCKET: &str = "video-storage-bucket";
const DEFAULT_S3_DOMAIN_SUFFIX: &str = "s3.amazonaws.com";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024 * 1024;

/// Static AWS credentials supplied through the environment
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Full service configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// Deployment stage
    pub environment: Environment,
    /// AWS region of the bucket
    pub aws_region: String,
    /// Bucket holding the videos
    pub s3_bucket_name: String,
    /// CDN hostname serving the bucket, if any
    pub cdn_domain: Option<String>,
    /// Domain suffix of bucket-native URLs (`{bucket}.{suffix}`)
    pub s3_domain_suffix: String,
    /// Static credentials; the SDK default chain is used when absent
    pub aws_credentials: Option<AwsCredentials>,
    /// Endpoint override for S3-compatible stores such as `LocalStack`
    pub aws_endpoint_url: Option<String>,
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: Level,
    /// Allowed CORS origins, `*` allows any
    pub cors_origins: Vec<String>,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
}

impl Settings {
    /// Reads the settings from process environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable or `LOG_LEVEL` cannot be parsed
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` holds an unknown environment name
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable or `LOG_LEVEL` cannot be parsed
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` holds an unknown environment name
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let environment = var("APP_ENV")
            .or_else(|| var("ENV"))
            .map_or(Environment::Development, |value| Environment::parse(&value));

        let port = match var("PORT") {
            Some(value) => value
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {value}"))?,
            None => DEFAULT_PORT,
        };

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(value) => value
                .parse()
                .with_context(|| format!("MAX_UPLOAD_BYTES is not a valid size: {value}"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let log_level = match var("LOG_LEVEL") {
            Some(value) => value
                .parse::<Level>()
                .with_context(|| format!("LOG_LEVEL is not a valid log level: {value}"))?,
            None => environment.default_log_level(),
        };

        let aws_credentials = match (var("AWS_ACCESS_KEY_ID"), var("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(AwsCredentials {
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        let cors_origins = var("BACKEND_CORS_ORIGINS").map_or_else(
            || vec!["*".to_string()],
            |value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(ToString::to_string)
                    .collect()
            },
        );

        Ok(Self {
            environment,
            aws_region: var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            s3_bucket_name: var("S3_BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            cdn_domain: var("CLOUDFRONT_DOMAIN"),
            s3_domain_suffix: var("S3_DOMAIN_SUFFIX")
                .unwrap_or_else(|| DEFAULT_S3_DOMAIN_SUFFIX.to_string()),
            aws_credentials,
            aws_endpoint_url: var("AWS_ENDPOINT_URL"),
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            log_level,
            cors_origins,
            max_upload_bytes,
        })
    }

    /// Whether any origin is allowed by CORS
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }

    /// AWS S3 client configuration
    ///
    /// SDK retries are disabled: a failed storage call is surfaced to the
    /// caller as-is.
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.aws_region.clone()))
            .retry_config(RetryConfig::disabled());

        if let Some(credentials) = &self.aws_credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                None,
                None,
                "settings",
            ));
        }

        if let Some(endpoint_url) = &self.aws_endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        // Path style addressing for S3-compatible endpoints
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if self.aws_endpoint_url.is_some() {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}
