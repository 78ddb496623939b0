// Catalog of the backend collections the front-end lists.
use crate::models::ColumnDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Branches,
    Vendors,
    Assets,
    WorkOrders,
    BreakdownReports,
    Inspections,
    ScrapRequests,
    Disposals,
    Certificates,
    Users,
    Roles,
}

impl Resource {
    pub const ALL: [Resource; 11] = [
        Resource::Branches,
        Resource::Vendors,
        Resource::Assets,
        Resource::WorkOrders,
        Resource::BreakdownReports,
        Resource::Inspections,
        Resource::ScrapRequests,
        Resource::Disposals,
        Resource::Certificates,
        Resource::Users,
        Resource::Roles,
    ];

    /// URL path segment under the API base.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Branches => "branches",
            Resource::Vendors => "vendors",
            Resource::Assets => "assets",
            Resource::WorkOrders => "work-orders",
            Resource::BreakdownReports => "breakdown-reports",
            Resource::Inspections => "inspections",
            Resource::ScrapRequests => "scrap-requests",
            Resource::Disposals => "disposals",
            Resource::Certificates => "certificates",
            Resource::Users => "users",
            Resource::Roles => "roles",
        }
    }

    pub fn title_key(self) -> String {
        format!("resources.{}", self.path().replace('-', "_"))
    }

    /// Field holding the row identifier.
    pub fn id_field(self) -> &'static str {
        match self {
            Resource::Assets => "asset_id",
            _ => "id",
        }
    }

    /// Whether the backend accepts document uploads for rows of this resource.
    pub fn accepts_documents(self) -> bool {
        matches!(
            self,
            Resource::Vendors | Resource::Assets | Resource::Certificates
        )
    }

    pub fn default_columns(self) -> Vec<ColumnDescriptor> {
        let col = ColumnDescriptor::new;
        match self {
            Resource::Branches => vec![
                col("columns.id", "id").hidden(),
                col("columns.branch_code", "branch_code"),
                col("columns.name", "name"),
                col("columns.city", "city"),
                col("columns.state", "state"),
                col("columns.contact_person", "contact_person"),
                col("columns.phone", "phone").hidden(),
            ],
            Resource::Vendors => vec![
                col("columns.id", "id").hidden(),
                col("columns.vendor_code", "vendor_code"),
                col("columns.name", "name"),
                col("columns.category", "category"),
                col("columns.email", "email"),
                col("columns.phone", "phone"),
                col("columns.gst_number", "gst_number").hidden(),
            ],
            Resource::Assets => vec![
                col("columns.asset_id", "asset_id"),
                col("columns.name", "name"),
                col("columns.category", "category"),
                col("columns.branch", "branch"),
                col("columns.serial_number", "serial_number"),
                col("columns.purchase_date", "purchase_date").hidden(),
                col("columns.status", "int_status"),
            ],
            Resource::WorkOrders => vec![
                col("columns.id", "id"),
                col("columns.asset_id", "asset_id"),
                col("columns.vendor", "vendor"),
                col("columns.description", "description"),
                col("columns.amount", "amount"),
                col("columns.due_date", "due_date"),
                col("columns.status", "int_status"),
            ],
            Resource::BreakdownReports => vec![
                col("columns.id", "id"),
                col("columns.asset_id", "asset_id"),
                col("columns.reported_by", "reported_by"),
                col("columns.reported_on", "reported_on"),
                col("columns.description", "description"),
                col("columns.status", "int_status"),
            ],
            Resource::Inspections => vec![
                col("columns.id", "id"),
                col("columns.asset_id", "asset_id"),
                col("columns.inspector", "inspector"),
                col("columns.inspection_date", "inspection_date"),
                col("columns.result", "result"),
                col("columns.remarks", "remarks").hidden(),
            ],
            Resource::ScrapRequests => vec![
                col("columns.id", "id"),
                col("columns.asset_id", "asset_id"),
                col("columns.reason", "reason"),
                col("columns.requested_by", "requested_by"),
                col("columns.book_value", "book_value"),
                col("columns.status", "int_status"),
            ],
            Resource::Disposals => vec![
                col("columns.id", "id"),
                col("columns.asset_id", "asset_id"),
                col("columns.disposal_method", "disposal_method"),
                col("columns.buyer", "buyer"),
                col("columns.sale_value", "sale_value"),
                col("columns.disposed_on", "disposed_on"),
            ],
            Resource::Certificates => vec![
                col("columns.id", "id"),
                col("columns.asset_id", "asset_id"),
                col("columns.certificate_type", "certificate_type"),
                col("columns.issued_by", "issued_by"),
                col("columns.valid_from", "valid_from"),
                col("columns.valid_to", "valid_to"),
            ],
            Resource::Users => vec![
                col("columns.id", "id").hidden(),
                col("columns.username", "username"),
                col("columns.name", "name"),
                col("columns.email", "email"),
                col("columns.role", "role"),
                col("columns.branch", "branch"),
            ],
            Resource::Roles => vec![
                col("columns.id", "id"),
                col("columns.name", "name"),
                col("columns.description", "description"),
            ],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = String;

    /// Accepts the path segment with either `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.path() == wanted)
            .ok_or_else(|| format!("unknown resource '{}'", s))
    }
}
