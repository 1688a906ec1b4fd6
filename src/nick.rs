//! Nickname generation.

use rand::Rng;

/// Produces the nickname sent with `NICK` on each registration.
pub trait NickGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Expands a template, replacing every `?` with a random decimal digit.
#[derive(Debug, Clone)]
pub struct TemplateNick {
    template: String,
}

impl TemplateNick {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl NickGenerator for TemplateNick {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        self.template
            .chars()
            .map(|c| match c {
                '?' => char::from(b'0' + rng.gen_range(0..10u8)),
                other => other,
            })
            .collect()
    }
}

/// Always returns the same nickname.
#[derive(Debug, Clone)]
pub struct FixedNick(pub String);

impl NickGenerator for FixedNick {
    fn generate(&self) -> String {
        self.0.clone()
    }
}
