//! Speaker page capabilities - infrastructure layer
//!
//! `SpeakerPage` is everything the capture and traversal layers may do to a
//! page. `JsExecutor` implements it against the live site; tests implement
//! it with a scripted fake.

use std::future::Future;

use anyhow::{bail, Result};
use serde::Deserialize;
use tracing::debug;

use crate::infrastructure::JsExecutor;
use crate::models::{RawSpeakerFields, SpeakerCardRef};

/// Card selector; one element per speaker, in display order
pub const CARD_SELECTOR: &str = "[data-speakerid]";
const NAME_SELECTOR: &str = "h3.sz-speaker__name";
const TAGLINE_SELECTOR: &str = "h4.sz-speaker__tagline";
const MODAL_SELECTOR: &str = "div.sz-speaker.sz-speaker--full";
const LINKS_SELECTOR: &str = "ul.sz-speaker__links a";
const CLOSE_BUTTON_SELECTOR: &str = "button.sz-modal__close";
const OVERLAY_SELECTOR: &str = ".sz-modal-overlay";
const COOKIE_BANNER_SELECTOR: &str = "#hs-eu-cookie-confirmation";

/// State of the speaker modal at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalProbe {
    /// No modal container on the page
    Closed,
    /// Container present, content not injected yet
    Rendering,
    /// Content slots present
    Ready(RawSpeakerFields),
}

/// DOM capabilities over one track page
pub trait SpeakerPage: Send + Sync {
    fn goto(&self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// Cards currently rendered, in DOM order
    fn list_cards(&self) -> impl Future<Output = Result<Vec<SpeakerCardRef>>> + Send;

    fn dismiss_cookie_banner(&self) -> impl Future<Output = Result<()>> + Send;

    /// Scroll the card into view and click it
    fn open_card(&self, card: &SpeakerCardRef) -> impl Future<Output = Result<()>> + Send;

    fn probe_modal(&self) -> impl Future<Output = Result<ModalProbe>> + Send;

    /// Fire the dismiss interaction; does not wait
    fn close_modal(&self) -> impl Future<Output = Result<()>> + Send;

    /// No modal open and the card list is clickable
    fn cards_interactive(&self) -> impl Future<Output = Result<bool>> + Send;
}

#[derive(Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
enum ProbePayload {
    Closed,
    Rendering,
    Ready { fields: RawSpeakerFields },
}

impl From<ProbePayload> for ModalProbe {
    fn from(payload: ProbePayload) -> Self {
        match payload {
            ProbePayload::Closed => ModalProbe::Closed,
            ProbePayload::Rendering => ModalProbe::Rendering,
            ProbePayload::Ready { fields } => ModalProbe::Ready(fields),
        }
    }
}

fn js_str(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

impl SpeakerPage for JsExecutor {
    async fn goto(&self, url: &str) -> Result<()> {
        JsExecutor::goto(self, url).await
    }

    async fn list_cards(&self) -> Result<Vec<SpeakerCardRef>> {
        let js_code = format!(
            r#"
            (() => {{
                const absolute = (src) => src ? new URL(src, location.href).href : null;
                return Array.from(document.querySelectorAll({cards})).map((el, index) => {{
                    const name = el.querySelector({name});
                    const img = el.querySelector('img');
                    return {{
                        index,
                        speakerId: el.getAttribute('data-speakerid'),
                        summaryName: name ? name.innerText : null,
                        summaryImage: img ? absolute(img.getAttribute('src') || img.getAttribute('data-src')) : null,
                    }};
                }});
            }})()
            "#,
            cards = js_str(CARD_SELECTOR),
            name = js_str(NAME_SELECTOR),
        );
        self.eval_as(js_code).await
    }

    async fn dismiss_cookie_banner(&self) -> Result<()> {
        let js_code = format!(
            r#"
            (() => {{
                const banner = document.querySelector({banner});
                if (!banner || banner.offsetParent === null) return false;
                const accept = banner.querySelector('button, a');
                if (!accept) return false;
                accept.click();
                return true;
            }})()
            "#,
            banner = js_str(COOKIE_BANNER_SELECTOR),
        );
        let dismissed: bool = self.eval_as(js_code).await?;
        if dismissed {
            debug!("Cookie banner dismissed");
        }
        Ok(())
    }

    async fn open_card(&self, card: &SpeakerCardRef) -> Result<()> {
        let by_id = match &card.speaker_id {
            Some(id) => js_str(&format!("[data-speakerid={}]", js_str(id))),
            None => "null".to_string(),
        };
        let js_code = format!(
            r#"
            (() => {{
                const selector = {by_id};
                const el = (selector && document.querySelector(selector))
                    || document.querySelectorAll({cards})[{index}];
                if (!el) return false;
                el.scrollIntoView({{ block: 'center' }});
                (el.querySelector({name}) || el).click();
                return true;
            }})()
            "#,
            cards = js_str(CARD_SELECTOR),
            name = js_str(NAME_SELECTOR),
            index = card.index,
        );
        let clicked: bool = self.eval_as(js_code).await?;
        if !clicked {
            bail!("card #{} is no longer in the DOM", card.index);
        }
        Ok(())
    }

    async fn probe_modal(&self) -> Result<ModalProbe> {
        let js_code = format!(
            r#"
            (() => {{
                const modal = document.querySelector({modal});
                if (!modal) return {{ state: 'closed' }};
                const name = modal.querySelector({name});
                if (!name) return {{ state: 'rendering' }};
                const tagline = modal.querySelector({tagline});
                const img = modal.querySelector('img');
                const src = img ? (img.getAttribute('src') || img.getAttribute('data-src')) : null;
                return {{
                    state: 'ready',
                    fields: {{
                        name: name.innerText,
                        title: tagline ? tagline.innerText : null,
                        imageUrl: src ? new URL(src, location.href).href : null,
                        anchors: Array.from(modal.querySelectorAll({links})).map((a) => ({{
                            href: a.getAttribute('href') ? a.href : null,
                            text: a.innerText || a.getAttribute('aria-label') || null,
                        }})),
                    }},
                }};
            }})()
            "#,
            modal = js_str(MODAL_SELECTOR),
            name = js_str(NAME_SELECTOR),
            tagline = js_str(TAGLINE_SELECTOR),
            links = js_str(LINKS_SELECTOR),
        );
        let payload: ProbePayload = self.eval_as(js_code).await?;
        Ok(payload.into())
    }

    async fn close_modal(&self) -> Result<()> {
        let js_code = format!(
            r#"
            (() => {{
                const button = document.querySelector({button});
                if (button) {{ button.click(); return 'button'; }}
                const overlay = document.querySelector({overlay});
                if (overlay) {{ overlay.click(); return 'overlay'; }}
                document.dispatchEvent(new KeyboardEvent('keydown', {{ key: 'Escape', bubbles: true }}));
                return 'escape';
            }})()
            "#,
            button = js_str(CLOSE_BUTTON_SELECTOR),
            overlay = js_str(OVERLAY_SELECTOR),
        );
        let via: String = self.eval_as(js_code).await?;
        debug!("Modal dismissed via {}", via);
        Ok(())
    }

    async fn cards_interactive(&self) -> Result<bool> {
        let js_code = format!(
            "!document.querySelector({modal}) && document.querySelectorAll({cards}).length > 0",
            modal = js_str(MODAL_SELECTOR),
            cards = js_str(CARD_SELECTOR),
        );
        self.eval_as(js_code).await
    }
}
