use crate::{config::Config, consts, errors::AgroserverLoaderError};
use encoding_rs::{Encoding, UTF_8};
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};

/// Bytes of the document searched for a `<meta>` charset declaration
const META_SNIFF_LEN: usize = 1024;

pub fn connect(config: &Config) -> Result<Client, AgroserverLoaderError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_str(consts::ACCEPT)?,
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_str(consts::ACCEPT_LANGUAGE)?,
    );

    let client = Client::builder()
        .user_agent(consts::get_user_agent())
        .default_headers(headers)
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

/// GET `url` and return the decoded body, non-success statuses are errors
pub async fn get_html<U: reqwest::IntoUrl>(
    client: &Client,
    url: U,
) -> Result<String, AgroserverLoaderError> {
    let res = client.get(url).send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(AgroserverLoaderError::HttpStatus {
            url: res.url().to_string(),
            status,
        });
    }
    let content_type = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = res.bytes().await?;
    debug!("Fetched {} bytes", body.len());
    Ok(decode_html(&body, content_type.as_deref()))
}

/// Decodes a page using the header charset, then a `<meta>` declaration, then UTF-8
pub fn decode_html(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| sniff_meta_charset(body))
        .unwrap_or(UTF_8);
    debug!("Decoding page as {}", encoding.name());

    let (text, _, malformed) = encoding.decode(body);
    if malformed {
        debug!("Page contains malformed {} sequences", encoding.name());
    }
    text.into_owned()
}

fn sniff_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_LEN)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    head.match_indices("<meta")
        .filter_map(|(start, _)| {
            let tag = &head[start..];
            let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
            charset_label(tag)
        })
        .find_map(|label| Encoding::for_label(label.as_bytes()))
}

/// Value of the first `charset=` parameter, quotes stripped
fn charset_label(text: &str) -> Option<String> {
    let lowered = text.to_ascii_lowercase();
    let start = lowered.find("charset")? + "charset".len();
    let value = lowered[start..].trim_start().strip_prefix('=')?;
    let label: String = value
        .trim_start()
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}
