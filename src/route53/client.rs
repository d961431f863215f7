//! Production Route 53 client over the AWS SDK.

use std::fmt;
use std::net::Ipv4Addr;

use aws_sdk_route53::Client;
use aws_sdk_route53::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};

use super::DnsApi;
use super::error::ProviderError;
use super::types::{
    ChangeRef, ChangeRequest, ChangeState, RecordSnapshot, ZoneSummary, names_match,
    strip_id_prefix,
};

/// Route 53 is a global service; the SDK still needs a signing region.
const SIGNING_REGION: &str = "us-east-1";

/// Route 53 client using static credentials supplied at startup.
pub struct Route53Client {
    inner: Client,
}

// The SDK client holds the credentials; keep them out of Debug output.
impl fmt::Debug for Route53Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route53Client").finish_non_exhaustive()
    }
}

impl Route53Client {
    /// Creates a client authenticated with the given access key pair.
    #[must_use]
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "ddns-r53");
        let config = aws_sdk_route53::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(SIGNING_REGION))
            .credentials_provider(credentials)
            .build();

        Self {
            inner: Client::from_conf(config),
        }
    }

    /// Creates a client from an already-configured SDK client.
    ///
    /// Useful when the caller needs custom endpoint or retry settings.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { inner: client }
    }
}

impl DnsApi for Route53Client {
    async fn find_zone(&self, zone_id: &str) -> Result<ZoneSummary, ProviderError> {
        let output = match self.inner.get_hosted_zone().id(zone_id).send().await {
            Ok(output) => output,
            Err(err) => {
                let err = err.into_service_error();
                if err.is_no_such_hosted_zone() {
                    return Err(ProviderError::ZoneNotFound {
                        zone_id: zone_id.to_string(),
                    });
                }
                return Err(ProviderError::api(DisplayErrorContext(&err)));
            }
        };

        let zone = output
            .hosted_zone
            .ok_or_else(|| ProviderError::malformed("GetHostedZone response had no hosted zone"))?;

        Ok(ZoneSummary {
            id: strip_id_prefix(&zone.id).to_string(),
            name: zone.name,
        })
    }

    async fn fetch_record_set(
        &self,
        zone_id: &str,
        domain: &str,
    ) -> Result<Option<RecordSnapshot>, ProviderError> {
        let output = match self
            .inner
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .start_record_name(domain)
            .start_record_type(RrType::A)
            .max_items(1)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let err = err.into_service_error();
                if err.is_no_such_hosted_zone() {
                    return Err(ProviderError::ZoneNotFound {
                        zone_id: zone_id.to_string(),
                    });
                }
                return Err(ProviderError::api(DisplayErrorContext(&err)));
            }
        };

        // Listing starts at (name, type) and may continue past it; anything
        // other than an exact match means the record-set does not exist.
        let Some(record_set) = output.resource_record_sets().first() else {
            return Ok(None);
        };

        if record_set.r#type() != &RrType::A || !names_match(record_set.name(), domain) {
            return Ok(None);
        }

        let ttl = record_set.ttl().ok_or_else(|| {
            ProviderError::malformed(format!(
                "record-set for '{domain}' has no TTL (alias record-sets are not supported)"
            ))
        })?;

        let mut values = Vec::with_capacity(record_set.resource_records().len());
        for record in record_set.resource_records() {
            let value = record.value();
            let addr: Ipv4Addr = value.parse().map_err(|_| {
                ProviderError::malformed(format!(
                    "record-set for '{domain}' holds a non-IPv4 value '{value}'"
                ))
            })?;
            values.push(addr);
        }

        if values.is_empty() {
            return Ok(None);
        }

        Ok(Some(RecordSnapshot {
            name: record_set.name().to_string(),
            ttl,
            values,
        }))
    }

    async fn submit_change(
        &self,
        zone_id: &str,
        request: &ChangeRequest,
    ) -> Result<ChangeRef, ProviderError> {
        let batch = build_change_batch(request)?;

        let output = match self
            .inner
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let err = err.into_service_error();
                if err.is_no_such_hosted_zone() {
                    return Err(ProviderError::ZoneNotFound {
                        zone_id: zone_id.to_string(),
                    });
                }
                if err.is_invalid_change_batch() {
                    return Err(ProviderError::InvalidChange {
                        message: DisplayErrorContext(&err).to_string(),
                    });
                }
                return Err(ProviderError::api(DisplayErrorContext(&err)));
            }
        };

        let info = output.change_info.ok_or_else(|| {
            ProviderError::malformed("ChangeResourceRecordSets response had no change info")
        })?;

        Ok(ChangeRef::new(
            &info.id,
            ChangeState::parse(info.status.as_str()),
        ))
    }

    async fn change_state(&self, change_id: &str) -> Result<ChangeState, ProviderError> {
        let output = self
            .inner
            .get_change()
            .id(change_id)
            .send()
            .await
            .map_err(|err| ProviderError::api(DisplayErrorContext(&err)))?;

        let info = output
            .change_info
            .ok_or_else(|| ProviderError::malformed("GetChange response had no change info"))?;

        Ok(ChangeState::parse(info.status.as_str()))
    }
}

/// Builds the atomic DELETE-all-old / CREATE-new batch from a change
/// request.
fn build_change_batch(request: &ChangeRequest) -> Result<ChangeBatch, ProviderError> {
    let mut delete_records = Vec::with_capacity(request.delete_values.len());
    for value in &request.delete_values {
        delete_records.push(ResourceRecord::builder().value(value.to_string()).build()?);
    }

    let delete_set = ResourceRecordSet::builder()
        .name(&request.name)
        .r#type(RrType::A)
        .ttl(request.ttl)
        .set_resource_records(Some(delete_records))
        .build()?;

    let create_set = ResourceRecordSet::builder()
        .name(&request.name)
        .r#type(RrType::A)
        .ttl(request.ttl)
        .resource_records(
            ResourceRecord::builder()
                .value(request.create_value.to_string())
                .build()?,
        )
        .build()?;

    let batch = ChangeBatch::builder()
        .changes(
            Change::builder()
                .action(ChangeAction::Delete)
                .resource_record_set(delete_set)
                .build()?,
        )
        .changes(
            Change::builder()
                .action(ChangeAction::Create)
                .resource_record_set(create_set)
                .build()?,
        )
        .build()?;

    Ok(batch)
}
