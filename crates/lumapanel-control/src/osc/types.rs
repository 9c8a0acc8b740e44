//! OSC type coercion and the frame payload codec

use crate::{error::ControlError, Result};
use lumapanel_core::{FrameFixture, InboundEvent};
use rosc::{OscMessage, OscType};

use super::address::{parse_address, FixtureParam, MessageAddress};

/// Number of values in one per-fixture frame block:
/// id, r, g, b, a, w, dimmer, strobe
pub const FRAME_BLOCK_LEN: usize = 8;

/// Coerce one OSC argument to f32.
///
/// Accepts Float/Double/Int/Long; everything else, and non-finite values,
/// is a decode error.
pub fn osc_to_f32(arg: &OscType) -> Result<f32> {
    let value = match arg {
        OscType::Float(f) => *f,
        OscType::Double(d) => *d as f32,
        OscType::Int(i) => *i as f32,
        OscType::Long(l) => *l as f32,
        other => {
            return Err(ControlError::InvalidMessage(format!(
                "Unsupported OSC type: {:?}",
                other
            )))
        }
    };
    if !value.is_finite() {
        return Err(ControlError::InvalidMessage(
            "Non-finite OSC value".to_string(),
        ));
    }
    Ok(value)
}

/// Coerce one OSC argument to f64 (used for frame timestamps)
pub fn osc_to_f64(arg: &OscType) -> Result<f64> {
    let value = match arg {
        OscType::Float(f) => *f as f64,
        OscType::Double(d) => *d,
        OscType::Int(i) => *i as f64,
        OscType::Long(l) => *l as f64,
        other => {
            return Err(ControlError::InvalidMessage(format!(
                "Unsupported OSC type: {:?}",
                other
            )))
        }
    };
    if !value.is_finite() {
        return Err(ControlError::InvalidMessage(
            "Non-finite OSC value".to_string(),
        ));
    }
    Ok(value)
}

fn frame_fixture_id(arg: &OscType) -> Result<u32> {
    let raw = osc_to_f64(arg)?;
    let id = raw as i64;
    if id < 1 || id > u32::MAX as i64 {
        return Err(ControlError::InvalidMessage(format!(
            "Invalid fixture id in frame: {}",
            raw
        )));
    }
    Ok(id as u32)
}

/// Decode a frame payload: timestamp followed by 8-value blocks.
///
/// A payload whose block region is not a multiple of 8 values is rejected
/// as a whole; no partial blocks are ever applied.
pub fn decode_frame_args(args: &[OscType]) -> Result<(f64, Vec<FrameFixture>)> {
    let Some((timestamp, blocks)) = args.split_first() else {
        return Err(ControlError::InvalidMessage(
            "Empty frame payload".to_string(),
        ));
    };
    let timestamp = osc_to_f64(timestamp)?;

    if blocks.len() % FRAME_BLOCK_LEN != 0 {
        return Err(ControlError::InvalidMessage(format!(
            "Frame payload length {} not a multiple of {}",
            blocks.len(),
            FRAME_BLOCK_LEN
        )));
    }

    let mut fixtures = Vec::with_capacity(blocks.len() / FRAME_BLOCK_LEN);
    for block in blocks.chunks_exact(FRAME_BLOCK_LEN) {
        fixtures.push(FrameFixture {
            id: frame_fixture_id(&block[0])?,
            red: osc_to_f32(&block[1])?,
            green: osc_to_f32(&block[2])?,
            blue: osc_to_f32(&block[3])?,
            amber: osc_to_f32(&block[4])?,
            white: osc_to_f32(&block[5])?,
            dimmer: osc_to_f32(&block[6])?,
            strobe: osc_to_f32(&block[7])?,
        });
    }
    Ok((timestamp, fixtures))
}

/// Encode a frame payload in the inbound layout
pub fn encode_frame_args(timestamp: f64, fixtures: &[FrameFixture]) -> Vec<OscType> {
    let mut args = Vec::with_capacity(1 + fixtures.len() * FRAME_BLOCK_LEN);
    args.push(OscType::Float(timestamp as f32));
    for block in fixtures {
        args.push(OscType::Int(block.id as i32));
        args.push(OscType::Float(block.red));
        args.push(OscType::Float(block.green));
        args.push(OscType::Float(block.blue));
        args.push(OscType::Float(block.amber));
        args.push(OscType::Float(block.white));
        args.push(OscType::Float(block.dimmer));
        args.push(OscType::Float(block.strobe));
    }
    args
}

/// Decode one OSC message into an inbound event
pub fn decode_message(message: &OscMessage) -> Result<InboundEvent> {
    match parse_address(&message.addr)? {
        MessageAddress::Hello => Ok(InboundEvent::Hello),
        MessageAddress::Fixture { id, param } => match param {
            FixtureParam::Color => {
                if message.args.len() < 5 {
                    return Err(ControlError::InvalidMessage(format!(
                        "{} expects 5 values, got {}",
                        message.addr,
                        message.args.len()
                    )));
                }
                Ok(InboundEvent::FixtureColor {
                    id,
                    red: osc_to_f32(&message.args[0])?,
                    green: osc_to_f32(&message.args[1])?,
                    blue: osc_to_f32(&message.args[2])?,
                    amber: osc_to_f32(&message.args[3])?,
                    white: osc_to_f32(&message.args[4])?,
                })
            }
            FixtureParam::Dimmer => {
                let arg = message.args.first().ok_or_else(|| {
                    ControlError::InvalidMessage(format!("{} expects a value", message.addr))
                })?;
                Ok(InboundEvent::FixtureDimmer {
                    id,
                    value: osc_to_f32(arg)?,
                })
            }
            FixtureParam::Strobe => {
                let arg = message.args.first().ok_or_else(|| {
                    ControlError::InvalidMessage(format!("{} expects a value", message.addr))
                })?;
                Ok(InboundEvent::FixtureStrobe {
                    id,
                    rate: osc_to_f32(arg)?,
                })
            }
        },
        MessageAddress::Frame => {
            let (timestamp, fixtures) = decode_frame_args(&message.args)?;
            Ok(InboundEvent::Frame {
                timestamp,
                fixtures,
            })
        }
    }
}
