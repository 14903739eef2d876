use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::Value;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Query parameter listing installation media; comma separated and/or
/// repeated.
pub const IMAGE_PATHS_PARAM: &str = "Image paths";

pub async fn create_distro(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<ApiSuccess<Vec<Value>>, ApiError> {
    let paths = image_paths(&params);

    let distros = state.inventory_service.import_distro(paths).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        distros.iter().map(|d| d.to_payload()).collect(),
    ))
}

fn image_paths(params: &[(String, String)]) -> Vec<String> {
    params
        .iter()
        .filter(|(key, _)| key == IMAGE_PATHS_PARAM)
        .flat_map(|(_, value)| value.split(','))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_image_paths_split_and_repeat() {
        let paths = image_paths(&params(&[
            ("Image paths", "/iso/a.iso,/iso/b.iso"),
            ("other", "/iso/ignored.iso"),
            ("Image paths", "/iso/c.iso"),
        ]));

        assert_eq!(paths, vec!["/iso/a.iso", "/iso/b.iso", "/iso/c.iso"]);
    }

    #[test]
    fn test_image_paths_absent() {
        assert!(image_paths(&params(&[("other", "x")])).is_empty());
    }
}
