//! Amazon Resource Names and the composite ids carried in their resource part.

use crate::error::{Error, Result};
use crate::id::{self, CompositeId, SEPARATOR};
use std::fmt;
use std::str::FromStr;

const ARN_PREFIX: &str = "arn";

/// `arn:partition:service:region:account-id:resource`
///
/// Region and account may be empty for global services; the resource part may
/// itself contain `:` and `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl FromStr for Arn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let sections: Vec<&str> = s.splitn(6, ':').collect();
        if sections.len() != 6 {
            return Err(Error::malformed_name(s, "not enough sections"));
        }
        if sections[0] != ARN_PREFIX {
            return Err(Error::malformed_name(s, "missing arn prefix"));
        }

        let arn = Arn {
            partition: sections[1].to_string(),
            service: sections[2].to_string(),
            region: sections[3].to_string(),
            account_id: sections[4].to_string(),
            resource: sections[5].to_string(),
        };

        if arn.partition.is_empty() {
            return Err(Error::malformed_name(s, "empty partition"));
        }
        if arn.service.is_empty() {
            return Err(Error::malformed_name(s, "empty service"));
        }
        if arn.resource.is_empty() {
            return Err(Error::malformed_name(s, "empty resource"));
        }

        Ok(arn)
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}:{}",
            ARN_PREFIX, self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

/// Where a resource type keeps its composite id inside an ARN:
/// `arn:...:<service>:...:<resource_type>/<scope>/<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedNameFormat<'a> {
    service: &'a str,
    resource_type: &'a str,
}

/// EventBridge Scheduler schedules, scoped by schedule group.
pub const SCHEDULE: QualifiedNameFormat<'static> =
    QualifiedNameFormat::new("scheduler", "schedule");

/// CloudFormation stacks: `stack/<stack-name>/<unique-id>`.
pub const CLOUDFORMATION_STACK: QualifiedNameFormat<'static> =
    QualifiedNameFormat::new("cloudformation", "stack");

impl<'a> QualifiedNameFormat<'a> {
    pub const fn new(service: &'a str, resource_type: &'a str) -> Self {
        Self {
            service,
            resource_type,
        }
    }

    pub fn service(&self) -> &'a str {
        self.service
    }

    pub fn resource_type(&self) -> &'a str {
        self.resource_type
    }

    /// Extract the `scope/name` id from a qualified name, still joined.
    pub fn id_from_qualified_name(&self, qualified_name: &str) -> Result<String> {
        let (scope, name) = self.split(qualified_name)?;
        Ok(id::encode(&scope, &name))
    }

    pub fn parse_id(&self, qualified_name: &str) -> Result<CompositeId> {
        let (scope, name) = self.split(qualified_name)?;
        CompositeId::new(scope, name)
    }

    pub fn qualified_name(
        &self,
        partition: &str,
        region: &str,
        account_id: &str,
        id: &CompositeId,
    ) -> String {
        Arn {
            partition: partition.to_string(),
            service: self.service.to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
            resource: format!("{}{}{}", self.resource_type, SEPARATOR, id),
        }
        .to_string()
    }

    fn split(&self, qualified_name: &str) -> Result<(String, String)> {
        let arn: Arn = qualified_name.parse()?;
        if arn.service != self.service {
            return Err(Error::malformed_name(
                qualified_name,
                format!("expected service {}, got {}", self.service, arn.service),
            ));
        }

        let suffix = arn
            .resource
            .strip_prefix(self.resource_type)
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .ok_or_else(|| {
                Error::malformed_name(
                    qualified_name,
                    format!("expected resource type {}", self.resource_type),
                )
            })?;

        id::decode(suffix).map_err(|e| match e {
            Error::MalformedId { reason, .. } => Error::malformed_name(qualified_name, reason),
            other => other,
        })
    }
}
