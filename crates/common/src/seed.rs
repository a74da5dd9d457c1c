//! Reference data shipped with the backend
//!
//! The tool and motor lists are the initial catalogs; the templates and
//! motor types drive protocol field retrieval.

use crate::fields::{LeafField, ProtocolField};
use crate::types::{Motor, NamedOption, Tool};

/// Protocol fields contributed by a template or a motor type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSource {
    pub option: NamedOption,
    pub fields: Vec<ProtocolField>,
}

impl FieldSource {
    fn new(id: &str, name: &str, fields: Vec<ProtocolField>) -> Self {
        Self {
            option: NamedOption {
                id: id.to_string(),
                name: name.to_string(),
            },
            fields,
        }
    }

    pub fn id(&self) -> &str {
        &self.option.id
    }
}

fn tool(id: u64, name: &str, serial: &str, category: &str) -> Tool {
    Tool {
        id,
        name: name.to_string(),
        serial_number: serial.to_string(),
        category: category.to_string(),
    }
}

fn motor(id: u64, model: &str, serial: &str, power: f64, voltage: f64, category: &str) -> Motor {
    Motor {
        id,
        model: model.to_string(),
        serial_number: serial.to_string(),
        power,
        voltage,
        category: category.to_string(),
    }
}

fn phases(names: &[&str]) -> Vec<LeafField> {
    names.iter().map(|n| LeafField::new(*n, "")).collect()
}

pub fn tools() -> Vec<Tool> {
    vec![
        tool(1, "Multimeter", "MM001", "Electrical"),
        tool(2, "Oscilloscope", "OS001", "Electrical"),
        tool(3, "Power Analyzer", "PA001", "Electrical"),
        tool(4, "Torque Wrench", "TW001", "Mechanical"),
        tool(5, "Vibration Analyzer", "VA001", "Mechanical"),
        tool(6, "Thermal Camera", "TC001", "Thermal"),
    ]
}

pub fn motors() -> Vec<Motor> {
    vec![
        motor(1, "EM100", "EM001", 5.0, 220.0, "AC Induction"),
        motor(2, "EM200", "EM002", 10.0, 380.0, "AC Induction"),
        motor(3, "EM300", "EM003", 15.0, 440.0, "AC Induction"),
        motor(4, "DC100", "DC001", 3.0, 24.0, "DC Motor"),
        motor(5, "DC200", "DC002", 7.0, 48.0, "DC Motor"),
        motor(6, "SM100", "SM001", 20.0, 480.0, "Synchronous"),
    ]
}

pub fn templates() -> Vec<FieldSource> {
    vec![
        FieldSource::new(
            "template1",
            "Standard Test Protocol",
            vec![
                ProtocolField::leaf("Visual Inspection", ""),
                ProtocolField::leaf("Insulation Resistance", ""),
                ProtocolField::group("Winding Resistance", phases(&["U-V", "V-W", "W-U"])),
                ProtocolField::leaf("No-Load Current", ""),
            ],
        ),
        FieldSource::new(
            "template2",
            "Extended Performance Test",
            vec![
                ProtocolField::leaf("Insulation Resistance", ""),
                ProtocolField::group("Winding Resistance", phases(&["U-V", "V-W", "W-U"])),
                ProtocolField::group(
                    "Load Test",
                    phases(&["25% Load", "50% Load", "75% Load", "100% Load"]),
                ),
                ProtocolField::leaf("Efficiency", ""),
                ProtocolField::group("Temperature Rise", phases(&["Winding", "Bearing DE", "Bearing NDE"])),
            ],
        ),
        FieldSource::new(
            "template3",
            "Safety Compliance Check",
            vec![
                ProtocolField::leaf("Protective Earth Continuity", ""),
                ProtocolField::leaf("Insulation Resistance", ""),
                ProtocolField::leaf("High Voltage Withstand", ""),
                ProtocolField::leaf("Nameplate Verified", ""),
            ],
        ),
    ]
}

pub fn motor_types() -> Vec<FieldSource> {
    vec![
        FieldSource::new(
            "type1",
            "AC Induction Motor",
            vec![
                ProtocolField::leaf("Slip", ""),
                ProtocolField::group("Vibration", phases(&["Drive End", "Non-Drive End"])),
            ],
        ),
        FieldSource::new(
            "type2",
            "DC Motor",
            vec![
                ProtocolField::leaf("Brush Condition", ""),
                ProtocolField::leaf("Commutator Condition", ""),
                ProtocolField::leaf("Field Current", ""),
            ],
        ),
        FieldSource::new(
            "type3",
            "Synchronous Motor",
            vec![
                ProtocolField::leaf("Excitation Current", ""),
                ProtocolField::leaf("Power Factor", ""),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CatalogRecord;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_unique() {
        let tool_ids: HashSet<_> = tools().iter().map(Tool::id).collect();
        assert_eq!(tool_ids.len(), tools().len());

        let motor_ids: HashSet<_> = motors().iter().map(Motor::id).collect();
        assert_eq!(motor_ids.len(), motors().len());
    }

    #[test]
    fn test_field_names_unique_per_pair() {
        for template in templates() {
            for motor_type in motor_types() {
                let mut seen = HashSet::new();
                for field in template.fields.iter().chain(motor_type.fields.iter()) {
                    assert!(
                        seen.insert(field.name().to_string()),
                        "duplicate field {} in {}/{}",
                        field.name(),
                        template.id(),
                        motor_type.id()
                    );
                }
            }
        }
    }
}
