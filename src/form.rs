//! Contact-form validation rules and small text utilities. Pure functions only;
//! the DOM side of the form lives in `frontend`.
//!
//! Submit-time and blur-time validation are deliberately asymmetric: the submit
//! handler rejects only the empty string (whitespace-only values pass), while
//! the blur validator trims before checking. Both asymmetries match the site's
//! shipped behavior and are pinned by tests.

pub const CONTACT_ADDRESS: &str = "projeto.vidasemrestricio@ifpr.edu.br";
pub const MAIL_SUBJECT: &str = "Mensagem do Site Vida Sem Restrição";
pub const BUTTON_REVERT_MS: u32 = 3_000;
pub const SUCCESS_LABEL: &str = "Mensagem enviada com sucesso!";
pub const SUCCESS_BACKGROUND: &str = "linear-gradient(135deg, #27ae60, #16a085)";
pub const INVALID_BORDER_COLOR: &str = "#e74c3c";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubmitError {
    MissingField,
    InvalidEmail,
}

impl SubmitError {
    /// Alert text, in the site's locale.
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingField => "Por favor, preencha todos os campos obrigatórios.",
            Self::InvalidEmail => "Por favor, insira um e-mail válido.",
        }
    }
}

/// Structural email check equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`: one `@`
/// with a non-empty left side, and a dot in the right side with non-empty text
/// on both sides of it. No whitespace anywhere. Not an RFC parse.
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.contains(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot < domain.len() - 1,
        None => false,
    }
}

/// Submit-time validation. Values are checked exactly as read from the fields:
/// no trimming, so whitespace-only input passes the emptiness check.
pub fn validate_submission(name: &str, email: &str, message: &str) -> Result<(), SubmitError> {
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(SubmitError::MissingField);
    }
    if !is_valid_email(email) {
        return Err(SubmitError::InvalidEmail);
    }
    Ok(())
}

/// Blur-time check for the name field: flag values that trim to nothing.
pub fn name_needs_attention(value: &str) -> bool {
    value.trim().is_empty()
}

/// Blur-time check for the email field: flag non-empty values that fail the
/// pattern. An empty field is left unflagged until submit.
pub fn email_needs_attention(value: &str) -> bool {
    !value.is_empty() && !is_valid_email(value)
}

/// Transient submit-button feedback. The idle label is captured on the first
/// transition out of idle; a resubmission that lands while feedback is still
/// showing keeps that label as the restore target instead of capturing the
/// feedback text.
#[derive(Default, Debug)]
pub struct SubmitFeedback {
    idle_label: Option<String>,
}

impl SubmitFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on a successful submission with the button's current label;
    /// returns the label to display.
    pub fn engage(&mut self, current_label: &str) -> &'static str {
        if self.idle_label.is_none() {
            self.idle_label = Some(current_label.to_owned());
        }
        SUCCESS_LABEL
    }

    /// Called when the revert timer fires; yields the label to restore and
    /// returns the state to idle.
    pub fn revert(&mut self) -> Option<String> {
        self.idle_label.take()
    }
}

/// The mailto deep link offered as the static-form fallback. Field values
/// must already be URI-encoded by the caller; the subject is embedded as-is.
pub fn mailto_link(encoded_name: &str, encoded_email: &str, encoded_message: &str) -> String {
    format!(
        "mailto:{CONTACT_ADDRESS}?subject={MAIL_SUBJECT}&body=Nome: {encoded_name}\
         %0AE-mail: {encoded_email}%0A%0AMensagem:%0A{encoded_message}"
    )
}

/// Title-case each word: a word starts at the first word character (letter,
/// digit or underscore) after whitespace or leading punctuation, is uppercased
/// there, and the rest of the non-whitespace run is lowercased. Punctuation
/// before a word passes through untouched, so `"(ana"` becomes `"(Ana"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            in_word = false;
            out.push(ch);
        } else if in_word {
            out.extend(ch.to_lowercase());
        } else if ch.is_alphanumeric() || ch == '_' {
            in_word = true;
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}
