//! Fragment navigation readiness.
//!
//! Scrolling to `#id` only lands correctly once every image on the page has
//! settled, because images change the layout as they load. This module
//! decides *when* and *where* to scroll; the host performs the scroll.

use std::future::Future;

use futures::future::join_all;
use log::debug;
use url::Url;

use crate::Result;

/// Load state of one image on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    Pending,
    Loaded,
    /// Broken images are not retried; they count as settled
    Failed,
}

impl ImageLoad {
    pub fn is_settled(self) -> bool {
        !matches!(self, ImageLoad::Pending)
    }
}

/// Fragment of `page_url` if it names one of `ids`.
///
/// ```
/// use screenshot_annotator::fragment::fragment_target;
/// let ids = ["chat-mode", "agent-mode"];
/// let target = fragment_target("https://example.com/#chat-mode", ids).unwrap();
/// assert_eq!(target.as_deref(), Some("chat-mode"));
/// assert_eq!(fragment_target("https://example.com/", ids).unwrap(), None);
/// ```
pub fn fragment_target<'a, I>(page_url: &str, ids: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let url = Url::parse(page_url)?;
    let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) else {
        return Ok(None);
    };
    let found = ids.into_iter().any(|id| id == fragment);
    if !found {
        debug!("No element with id '{}' on the page", fragment);
    }
    Ok(found.then(|| fragment.to_string()))
}

/// Wait until every image has loaded or failed, then resolve the scroll
/// target for `page_url`.
pub async fn settle_then_target<'a, I, F>(
    page_url: &str,
    ids: I,
    images: Vec<F>,
) -> Result<Option<String>>
where
    I: IntoIterator<Item = &'a str>,
    F: Future<Output = ImageLoad>,
{
    let states = join_all(images).await;
    let broken = states.iter().filter(|s| **s == ImageLoad::Failed).count();
    debug!("{} images settled ({} failed)", states.len(), broken);
    fragment_target(page_url, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::ready;

    #[test]
    fn pending_is_the_only_unsettled_state() {
        assert!(!ImageLoad::Pending.is_settled());
        assert!(ImageLoad::Loaded.is_settled());
        assert!(ImageLoad::Failed.is_settled());
    }

    #[test]
    fn unknown_or_empty_fragment_has_no_target() {
        let ids = ["agent-mode"];
        assert_eq!(fragment_target("https://example.com/#nope", ids).unwrap(), None);
        assert_eq!(fragment_target("https://example.com/#", ids).unwrap(), None);
        assert!(fragment_target("not a url", ids).is_err());
    }

    #[test]
    fn failed_images_do_not_block_navigation() {
        let images = vec![ready(ImageLoad::Loaded), ready(ImageLoad::Failed)];
        let target = futures::executor::block_on(settle_then_target(
            "https://example.com/features#xcode-26-integration",
            ["claude-code", "xcode-26-integration"],
            images,
        ))
        .unwrap();
        assert_eq!(target.as_deref(), Some("xcode-26-integration"));
    }
}
