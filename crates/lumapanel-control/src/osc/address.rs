//! OSC address space parser
//!
//! Parses inbound addresses like `/fixture/3/dimmer` to typed message
//! addresses and builds the outbound address strings. Unknown addresses and
//! unknown fixture parameters are decode errors, never silent no-ops.

use crate::{error::ControlError, Result};
use lumapanel_core::FixtureId;

/// Maximum length of an OSC address string
const MAX_ADDRESS_LENGTH: usize = 256;

/// Inbound hello notification
pub const HELLO_ADDRESS: &str = "/app/hello";
/// Outbound startup announcement
pub const READY_ADDRESS: &str = "/app/ready";
/// Outbound mode notification
pub const MODE_ADDRESS: &str = "/ui/mode";
/// Outbound selection notification
pub const SELECT_ADDRESS: &str = "/ui/select";
/// Batched frame message, both directions
pub const FRAME_ADDRESS: &str = "/frame";

/// Per-fixture parameter named in an address path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureParam {
    /// Five color channels
    Color,
    /// Master dimmer
    Dimmer,
    /// Strobe rate
    Strobe,
}

impl FixtureParam {
    fn from_segment(segment: &str) -> Result<Self> {
        match segment {
            "color" => Ok(Self::Color),
            "dimmer" => Ok(Self::Dimmer),
            "strobe" => Ok(Self::Strobe),
            other => Err(ControlError::InvalidMessage(format!(
                "Unknown fixture parameter: {}",
                other
            ))),
        }
    }

    fn segment(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Dimmer => "dimmer",
            Self::Strobe => "strobe",
        }
    }
}

/// A parsed inbound message address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAddress {
    /// `/app/hello`
    Hello,
    /// `/fixture/{id}/{param}`
    Fixture {
        /// Fixture id, 1-based
        id: FixtureId,
        /// Addressed parameter
        param: FixtureParam,
    },
    /// `/frame`
    Frame,
}

/// Parse an inbound OSC address
///
/// Supported address patterns:
/// - `/app/hello` - engine hello
/// - `/fixture/{id}/color` - per-fixture color (5 floats)
/// - `/fixture/{id}/dimmer` - per-fixture dimmer (1 float)
/// - `/fixture/{id}/strobe` - per-fixture strobe (1 float)
/// - `/frame` - batched frame (timestamp + 8-value blocks)
pub fn parse_address(address: &str) -> Result<MessageAddress> {
    if address.len() > MAX_ADDRESS_LENGTH {
        return Err(ControlError::InvalidMessage(format!(
            "OSC address too long (max {} chars)",
            MAX_ADDRESS_LENGTH
        )));
    }

    if address == HELLO_ADDRESS {
        return Ok(MessageAddress::Hello);
    }
    if address == FRAME_ADDRESS {
        return Ok(MessageAddress::Frame);
    }

    let parts: Vec<&str> = address.trim_start_matches('/').split('/').collect();
    match parts.as_slice() {
        ["fixture", id, param] => {
            let id: FixtureId = id.parse().map_err(|_| {
                ControlError::InvalidMessage(format!("Invalid fixture id: {}", id))
            })?;
            if id == 0 {
                return Err(ControlError::InvalidMessage(
                    "Fixture ids start at 1".to_string(),
                ));
            }
            Ok(MessageAddress::Fixture {
                id,
                param: FixtureParam::from_segment(param)?,
            })
        }
        _ => Err(ControlError::InvalidMessage(format!(
            "Unknown OSC address: {}",
            address
        ))),
    }
}

/// Build the outbound address for a per-fixture message
pub fn fixture_address(id: FixtureId, param: FixtureParam) -> String {
    format!("/fixture/{}/{}", id, param.segment())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello() {
        assert_eq!(parse_address("/app/hello").unwrap(), MessageAddress::Hello);
    }

    #[test]
    fn test_parse_frame() {
        assert_eq!(parse_address("/frame").unwrap(), MessageAddress::Frame);
    }

    #[test]
    fn test_parse_fixture_params() {
        assert_eq!(
            parse_address("/fixture/3/color").unwrap(),
            MessageAddress::Fixture {
                id: 3,
                param: FixtureParam::Color
            }
        );
        assert_eq!(
            parse_address("/fixture/12/dimmer").unwrap(),
            MessageAddress::Fixture {
                id: 12,
                param: FixtureParam::Dimmer
            }
        );
        assert_eq!(
            parse_address("/fixture/1/strobe").unwrap(),
            MessageAddress::Fixture {
                id: 1,
                param: FixtureParam::Strobe
            }
        );
    }

    #[test]
    fn test_unknown_addresses_are_errors() {
        assert!(parse_address("/unknown").is_err());
        assert!(parse_address("/fixture/3").is_err());
        assert!(parse_address("/fixture/3/pan").is_err());
        assert!(parse_address("/fixture/notanumber/color").is_err());
        assert!(parse_address("/app/goodbye").is_err());
    }

    #[test]
    fn test_fixture_id_zero_rejected() {
        assert!(parse_address("/fixture/0/color").is_err());
    }

    #[test]
    fn test_huge_address_rejected() {
        let huge = format!("/fixture/1/{}", "a".repeat(1000));
        assert!(parse_address(&huge).is_err());
    }

    #[test]
    fn test_round_trip_fixture_addresses() {
        for param in [FixtureParam::Color, FixtureParam::Dimmer, FixtureParam::Strobe] {
            let address = fixture_address(5, param);
            assert_eq!(
                parse_address(&address).unwrap(),
                MessageAddress::Fixture { id: 5, param }
            );
        }
    }
}
