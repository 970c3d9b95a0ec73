//! WhatsApp hand-off links

use crate::core::Config;

/// Builds `https://<provider>/<phone>?text=<encoded>` deep links
#[derive(Debug, Clone)]
pub struct ChatLink {
    base_url: String,
    phone: String,
}

impl ChatLink {
    pub fn new(base_url: impl Into<String>, phone: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            phone: phone.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.chat_base_url, &config.chat_phone)
    }

    pub fn link(&self, text: &str) -> String {
        format!(
            "{}/{}?text={}",
            self.base_url,
            self.phone,
            urlencoding::encode(text)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_encodes_message() {
        let chat = ChatLink::new("https://wa.me/", "5511958877900");
        let link = chat.link("*Olá!* R$ 10.00\nfim");
        assert_eq!(
            link,
            "https://wa.me/5511958877900?text=%2AOl%C3%A1%21%2A%20R%24%2010.00%0Afim"
        );
    }

    #[test]
    fn test_link_round_trips_through_decode() {
        let chat = ChatLink::new("https://wa.me", "5511958877900");
        let text = "*🍱 MEU KIT SEMANAL (35 Marmitas):*\n- Sopa de Abóbora (R$ 22.50)";
        let link = chat.link(text);
        let encoded = link.split_once("?text=").unwrap().1;
        assert_eq!(urlencoding::decode(encoded).unwrap(), text);
    }
}
