use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(ToSchema)]
pub struct SuccessDoc { pub success: bool }

/// `blocked` is 0 or 1 on the wire.
#[derive(ToSchema)]
pub struct FixedExtensionDoc { pub extension: String, pub blocked: u8 }

#[derive(ToSchema)]
pub struct ToggleFixedDoc { pub blocked: bool }

#[derive(ToSchema)]
pub struct CustomExtensionDoc {
    pub extension: String,
    /// RFC 3339 timestamp, millisecond precision.
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct AddCustomDoc { pub extension: String }

#[derive(ToSchema)]
pub struct AddCustomResponseDoc { pub success: bool, pub extension: String }

#[derive(ToSchema)]
pub struct BlockedExtensionsDoc {
    pub fixed: Vec<String>,
    pub custom: Vec<String>,
    pub all: Vec<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::extensions::list_fixed,
        crate::routes::extensions::toggle_fixed,
        crate::routes::extensions::list_custom,
        crate::routes::extensions::add_custom,
        crate::routes::extensions::delete_custom,
        crate::routes::extensions::list_blocked,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            SuccessDoc,
            FixedExtensionDoc,
            ToggleFixedDoc,
            CustomExtensionDoc,
            AddCustomDoc,
            AddCustomResponseDoc,
            BlockedExtensionsDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "extensions")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/api/fixed-extensions",
            "/api/fixed-extensions/{extension}",
            "/api/custom-extensions",
            "/api/custom-extensions/{extension}",
            "/api/blocked-extensions",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected}");
        }
    }
}
