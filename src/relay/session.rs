//! Guided intake dialogue.
//!
//! A `Session` walks the caller through role, city, name and phone, then asks
//! for confirmation. It is a pure state machine: every call to
//! [`Session::handle`] consumes one utterance and returns the reply to speak,
//! plus the confirmed lead when the caller says yes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text::{extract_phone, looks_no, looks_yes, role_from_text, title_case};

pub const GREETING: &str = "Bienvenido a SpainRoom. ¿Es usted propietario o inquilino?";
pub const NOT_UNDERSTOOD: &str = "No le he entendido. ¿Podría repetirlo, por favor?";
pub const ASK_ROLE_AGAIN: &str = "¿Es propietario o inquilino?";
pub const ASK_CITY: &str = "De acuerdo. ¿En qué ciudad o población?";
pub const ASK_NAME: &str = "Perfecto. ¿Su nombre y apellidos, por favor?";
pub const ASK_PHONE: &str = "Gracias. ¿Me indica un teléfono de contacto?";
pub const ASK_PHONE_AGAIN: &str =
    "No he captado bien el teléfono. Dígamelo dígito a dígito, por favor.";
pub const FAREWELL: &str =
    "Perfecto. Un asesor de SpainRoom se pondrá en contacto con usted. ¡Gracias!";
pub const RESTART: &str = "De acuerdo, volvemos a empezar. ¿Es usted propietario o inquilino?";
pub const ASK_CONFIRM_AGAIN: &str = "¿Podría confirmar si es correcto, sí o no?";
pub const ANYTHING_ELSE: &str = "¿Desea algo más?";

/// Whether the caller owns a property or is looking to rent one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "propietario")]
    Owner,
    #[serde(rename = "inquilino")]
    Tenant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => write!(f, "propietario"),
            Role::Tenant => write!(f, "inquilino"),
        }
    }
}

/// Position in the intake dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Role,
    City,
    Name,
    Phone,
    Confirm,
    Done,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Role => write!(f, "role"),
            Step::City => write!(f, "city"),
            Step::Name => write!(f, "name"),
            Step::Phone => write!(f, "phone"),
            Step::Confirm => write!(f, "confirm"),
            Step::Done => write!(f, "done"),
        }
    }
}

/// Contact details gathered so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub role: Option<Role>,
    pub city: String,
    pub name: String,
    pub phone: String,
}

/// Result of handling one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Text to speak back to the caller
    pub reply: String,
    /// Set when this utterance confirmed the lead
    pub confirmed: Option<Lead>,
}

impl Turn {
    fn say(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            confirmed: None,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    step: Step,
    lead: Lead,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: Step::Role,
            lead: Lead::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn lead(&self) -> &Lead {
        &self.lead
    }

    /// Advance the dialogue with one utterance. `None` means nothing usable
    /// was heard.
    pub fn handle(&mut self, utterance: Option<&str>) -> Turn {
        let Some(text) = utterance.map(str::trim).filter(|t| !t.is_empty()) else {
            return Turn::say(NOT_UNDERSTOOD);
        };

        match self.step {
            Step::Role => match role_from_text(text) {
                Some(role) => {
                    self.lead.role = Some(role);
                    self.step = Step::City;
                    Turn::say(ASK_CITY)
                }
                None => Turn::say(ASK_ROLE_AGAIN),
            },
            Step::City => {
                self.lead.city = title_case(text);
                self.step = Step::Name;
                Turn::say(ASK_NAME)
            }
            Step::Name => {
                self.lead.name = title_case(text);
                self.step = Step::Phone;
                Turn::say(ASK_PHONE)
            }
            Step::Phone => match extract_phone(text) {
                Some(phone) => {
                    self.lead.phone = phone;
                    self.step = Step::Confirm;
                    Turn::say(self.summary())
                }
                None => Turn::say(ASK_PHONE_AGAIN),
            },
            Step::Confirm => {
                if looks_yes(text) {
                    self.step = Step::Done;
                    Turn {
                        reply: FAREWELL.to_string(),
                        confirmed: Some(self.lead.clone()),
                    }
                } else if looks_no(text) {
                    self.step = Step::Role;
                    self.lead = Lead::default();
                    Turn::say(RESTART)
                } else {
                    Turn::say(ASK_CONFIRM_AGAIN)
                }
            }
            Step::Done => Turn::say(ANYTHING_ELSE),
        }
    }

    fn summary(&self) -> String {
        let role = self.lead.role.map(|r| r.to_string()).unwrap_or_default();
        format!(
            "Entonces, {}, {} en {}, teléfono {}. ¿Es correcto?",
            self.lead.name, role, self.lead.city, self.lead.phone
        )
    }
}
