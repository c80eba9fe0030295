//! PT hardware model names and the device kinds they stand for.

use netar_core::DeviceKind;

/// Kind name given to devices whose model is not in [`MODELS`].
pub const UNKNOWN_KIND: &str = "unknown";

/// One PT model per known device kind.
const MODELS: [(&str, DeviceKind); 6] = [
    ("PC-PT", DeviceKind::Pc),
    ("Laptop-PT", DeviceKind::Laptop),
    ("2960-24TT", DeviceKind::Switch),
    ("ISR4331", DeviceKind::Router),
    ("Server-PT", DeviceKind::Server),
    ("5505", DeviceKind::Firewall),
];

/// The device kind of a PT model, if the model is known.
pub fn kind_for_model(model: &str) -> Option<DeviceKind> {
    MODELS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, kind)| kind.clone())
}

/// The PT model written for a device kind. Opaque kinds are written verbatim.
pub fn model_for_kind(kind: &DeviceKind) -> &str {
    MODELS
        .iter()
        .find(|(_, known)| known == kind)
        .map_or(kind.as_str(), |(model, _)| model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_a_bijection_on_known_kinds() {
        for kind in DeviceKind::KNOWN {
            let model = model_for_kind(&kind);
            assert_eq!(kind_for_model(model), Some(kind));
        }
    }

    #[test]
    fn test_opaque_kind_written_verbatim() {
        let kind = DeviceKind::Other("3650-24PS".to_string());
        assert_eq!(model_for_kind(&kind), "3650-24PS");
        assert_eq!(kind_for_model("3650-24PS"), None);
    }
}
