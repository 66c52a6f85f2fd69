//! URL construction helpers for the McM REST API.

use url::Url;

use crate::error::McmResult;
use crate::models::McmConfig;

const REQUEST_GET: &str = "public/restapi/requests/get/";
const REQUEST_LIST_WITH_FILE: &str = "public/restapi/requests/listwithfile";
const TICKET_GET: &str = "public/restapi/mccms/get/";
const FRAGMENT_GET: &str = "public/restapi/requests/get_fragment/";
const TEST_SCRIPT_GET: &str = "public/restapi/requests/get_test/";

fn with_id(config: &McmConfig, endpoint: &str, id: &str) -> McmResult<Url> {
    let path = format!("{endpoint}{}", urlencoding::encode(id.trim()));
    Ok(config.base_url.join(&path)?)
}

pub fn build_request_url(config: &McmConfig, prepid: &str) -> McmResult<Url> {
    with_id(config, REQUEST_GET, prepid)
}

pub fn build_ticket_url(config: &McmConfig, ticket: &str) -> McmResult<Url> {
    with_id(config, TICKET_GET, ticket)
}

pub fn build_fragment_url(config: &McmConfig, prepid: &str) -> McmResult<Url> {
    with_id(config, FRAGMENT_GET, prepid)
}

pub fn build_test_script_url(config: &McmConfig, prepid: &str) -> McmResult<Url> {
    with_id(config, TEST_SCRIPT_GET, prepid)
}

pub fn build_list_with_file_url(config: &McmConfig) -> McmResult<Url> {
    Ok(config.base_url.join(REQUEST_LIST_WITH_FILE)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url() {
        let url = build_request_url(&McmConfig::default(), "HIG-RunIIFall18wmLHEGS-00001").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cms-pdmv.cern.ch/mcm/public/restapi/requests/get/HIG-RunIIFall18wmLHEGS-00001"
        );
    }

    #[test]
    fn test_ticket_url_on_dev() {
        let config = McmConfig {
            base_url: Url::parse(crate::config::DEV_BASE_URL).unwrap(),
            ..McmConfig::default()
        };
        let url = build_ticket_url(&config, "HIG-2018Oct01-00001").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cms-pdmv-dev.cern.ch/mcm/public/restapi/mccms/get/HIG-2018Oct01-00001"
        );
    }

    #[test]
    fn test_text_urls() {
        let config = McmConfig::default();
        assert!(
            build_fragment_url(&config, "X")
                .unwrap()
                .path()
                .ends_with("/requests/get_fragment/X")
        );
        assert!(
            build_test_script_url(&config, "X")
                .unwrap()
                .path()
                .ends_with("/requests/get_test/X")
        );
    }

    #[test]
    fn test_ids_are_encoded() {
        let url = build_request_url(&McmConfig::default(), "a/b").unwrap();
        assert!(url.path().ends_with("/get/a%2Fb"));
    }

    #[test]
    fn test_list_with_file_url() {
        let url = build_list_with_file_url(&McmConfig::default()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cms-pdmv.cern.ch/mcm/public/restapi/requests/listwithfile"
        );
    }
}
