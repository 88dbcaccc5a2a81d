/// Channel classification and display metadata.
///
/// The upstream API labels each measured parameter with loosely-typed
/// Ukrainian text that may embed HTML markup and entities, e.g.
/// `"ТЧ2,5,&nbsp;мкг/м<sup>3</sup>"`. This module is the single source
/// of truth for turning those labels into `Channel` tags, and for the
/// per-channel display metadata consumed by the presentation adapter —
/// all other modules should go through `classify` and `descriptor_for`
/// rather than matching on label text themselves.

use crate::model::Channel;

// ---------------------------------------------------------------------------
// Label cleaning
// ---------------------------------------------------------------------------

/// Normalizes a raw upstream label: strips `<tag>`-style markup, decodes
/// HTML entities, collapses whitespace runs to a single space, and trims.
/// Idempotent: cleaning an already-clean label is a no-op.
///
/// `clean_label("<b>ТЧ2,5</b>,&nbsp;мкг/м<sup>3</sup>")` == `"ТЧ2,5, мкг/м3"`.
pub fn clean_label(raw: &str) -> String {
    // Decoding can uncover entity-encoded markup ("&lt;b&gt;" becomes
    // "<b>"), so strip+decode runs to a fixpoint. Terminates: every
    // non-identity pass shortens the string, since a stripped tag loses
    // at least its angle brackets and a decoded entity collapses to one
    // character.
    let mut decoded = raw.to_string();
    loop {
        let next = decode_entities(&strip_tags(&decoded));
        if next == decoded {
            break;
        }
        decoded = next;
    }

    // Collapse whitespace (including non-breaking spaces) and trim ends.
    let mut out = String::with_capacity(decoded.len());
    let mut in_space = false;
    for ch in decoded.chars() {
        if ch.is_whitespace() {
            if !in_space && !out.is_empty() {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Drops everything between `<` and the next `>`, inclusive.
/// An unterminated `<` swallows the rest of the string, which matches
/// how the upstream labels are actually malformed when they are.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Decodes the HTML entities the upstream actually emits: the common
/// named set plus numeric character references.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match tail.find(';') {
            // Entities are short and alphanumeric (plus '#' for numeric
            // references); anything else is a bare ampersand.
            Some(semi)
                if (2..=10).contains(&semi)
                    && tail[1..semi]
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '#') =>
            {
                let entity = &tail[1..semi];
                match decode_entity(entity) {
                    Some(decoded) => out.push(decoded),
                    None => out.push_str(&tail[..semi + 1]),
                }
                rest = &tail[semi + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "nbsp" => Some(' '),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or(entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)
        }
    }
}

// ---------------------------------------------------------------------------
// Classification table
// ---------------------------------------------------------------------------

/// Ordered substring table mapping Ukrainian label fragments to channels.
///
/// Matching is by substring containment against the cleaned label, in
/// table order, first hit wins. Order is load-bearing: `ТЧ1` is a
/// substring of `ТЧ10`, so the particulate keys must be tested from most
/// to least specific (`ТЧ2,5`, `ТЧ10`, then `ТЧ1`). The classification
/// tests audit this against real upstream label samples.
pub static CHANNEL_NAME_TABLE: &[(&str, Channel)] = &[
    ("ТЧ2,5", Channel::Pm25),
    ("ТЧ10", Channel::Pm10),
    ("ТЧ1", Channel::Pm1),
    ("Озон – O", Channel::Ozone),
    ("Діоксид азоту – NO", Channel::No2),
    ("Діоксид сірки – SO", Channel::So2),
    ("Оксид вуглецю – CO", Channel::Co),
    ("Температура повітря", Channel::Temperature),
    ("Вологість", Channel::Humidity),
    ("Тиск", Channel::Pressure),
    ("Швидкість вітру", Channel::WindSpeed),
    ("Напрям вітру", Channel::WindDirection),
];

/// Classifies a raw upstream parameter label into a channel.
///
/// Returns `None` for labels matching no table entry; an unrecognized
/// parameter is not an error, it is simply excluded from channel-keyed
/// lookups while remaining in the raw parameter sequence.
pub fn classify(raw_name: &str) -> Option<Channel> {
    let cleaned = clean_label(raw_name);
    CHANNEL_NAME_TABLE
        .iter()
        .find(|(key, _)| cleaned.contains(key))
        .map(|(_, channel)| *channel)
}

// ---------------------------------------------------------------------------
// Display descriptors
// ---------------------------------------------------------------------------

/// Display metadata for one channel, consumed by the generic presentation
/// adapter. One data row per channel replaces the per-channel sensor
/// subclasses the service previously needed.
pub struct ChannelDescriptor {
    pub channel: Channel,
    /// English display name.
    pub name: &'static str,
    pub unit: &'static str,
    /// Suggested Material Design icon.
    pub icon: &'static str,
    /// Device-class tag understood by display layers; not every channel
    /// has one (wind direction does not).
    pub device_class: Option<&'static str>,
}

const UGM3: &str = "µg/m³";

/// Descriptors for all twelve channels, ordered as `Channel::ALL`.
pub static CHANNEL_DESCRIPTORS: &[ChannelDescriptor] = &[
    ChannelDescriptor {
        channel: Channel::Pm25,
        name: "PM2.5",
        unit: UGM3,
        icon: "mdi:dots-hexagon",
        device_class: Some("pm25"),
    },
    ChannelDescriptor {
        channel: Channel::Pm10,
        name: "PM10",
        unit: UGM3,
        icon: "mdi:dots-hexagon",
        device_class: Some("pm10"),
    },
    ChannelDescriptor {
        channel: Channel::Pm1,
        name: "PM1",
        unit: UGM3,
        icon: "mdi:dots-hexagon",
        device_class: Some("pm1"),
    },
    ChannelDescriptor {
        channel: Channel::Ozone,
        name: "Ozone",
        unit: UGM3,
        icon: "mdi:molecule",
        device_class: Some("ozone"),
    },
    ChannelDescriptor {
        channel: Channel::No2,
        name: "Nitrogen Dioxide",
        unit: UGM3,
        icon: "mdi:molecule",
        device_class: Some("nitrogen_dioxide"),
    },
    ChannelDescriptor {
        channel: Channel::So2,
        name: "Sulfur Dioxide",
        unit: UGM3,
        icon: "mdi:molecule",
        device_class: Some("sulphur_dioxide"),
    },
    ChannelDescriptor {
        channel: Channel::Co,
        name: "Carbon Monoxide",
        unit: UGM3,
        icon: "mdi:molecule-co",
        device_class: Some("carbon_monoxide"),
    },
    ChannelDescriptor {
        channel: Channel::Temperature,
        name: "Temperature",
        unit: "°C",
        icon: "mdi:thermometer",
        device_class: Some("temperature"),
    },
    ChannelDescriptor {
        channel: Channel::Humidity,
        name: "Humidity",
        unit: "%",
        icon: "mdi:water-percent",
        device_class: Some("humidity"),
    },
    ChannelDescriptor {
        channel: Channel::Pressure,
        name: "Pressure",
        unit: "hPa",
        icon: "mdi:gauge",
        device_class: Some("atmospheric_pressure"),
    },
    ChannelDescriptor {
        channel: Channel::WindSpeed,
        name: "Wind Speed",
        unit: "m/s",
        icon: "mdi:weather-windy",
        device_class: Some("wind_speed"),
    },
    ChannelDescriptor {
        channel: Channel::WindDirection,
        name: "Wind Direction",
        unit: "°",
        icon: "mdi:compass",
        device_class: None,
    },
];

/// Looks up the descriptor for a channel.
///
/// The descriptor table is ordered as `Channel::ALL`; the alignment is
/// locked by a test, so the positional lookup cannot miss.
pub fn descriptor_for(channel: Channel) -> &'static ChannelDescriptor {
    let idx = Channel::ALL
        .iter()
        .position(|c| *c == channel)
        .expect("Channel::ALL covers every channel");
    &CHANNEL_DESCRIPTORS[idx]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Real upstream labels as they appear in post detail documents,
    /// paired with the channel each must classify to.
    fn upstream_label_samples() -> Vec<(&'static str, Channel)> {
        vec![
            ("ТЧ2,5,&nbsp;мкг/м<sup>3</sup>", Channel::Pm25),
            ("ТЧ10,&nbsp;мкг/м<sup>3</sup>", Channel::Pm10),
            ("ТЧ1,&nbsp;мкг/м<sup>3</sup>", Channel::Pm1),
            ("Озон – O<sub>3</sub>,&nbsp;мкг/м<sup>3</sup>", Channel::Ozone),
            ("Діоксид азоту – NO<sub>2</sub>,&nbsp;мкг/м<sup>3</sup>", Channel::No2),
            ("Діоксид сірки – SO<sub>2</sub>,&nbsp;мкг/м<sup>3</sup>", Channel::So2),
            ("Оксид вуглецю – CO,&nbsp;мкг/м<sup>3</sup>", Channel::Co),
            ("Температура повітря, °С", Channel::Temperature),
            ("Вологість, %", Channel::Humidity),
            ("Тиск, кПа", Channel::Pressure),
            ("Швидкість вітру, м/с", Channel::WindSpeed),
            ("Напрям вітру, °", Channel::WindDirection),
        ]
    }

    // --- clean_label --------------------------------------------------------

    #[test]
    fn test_clean_label_strips_tags_and_decodes_entities() {
        assert_eq!(
            clean_label("<b>ТЧ2,5</b>,&nbsp;мкг/м<sup>3</sup>"),
            "ТЧ2,5, мкг/м3"
        );
    }

    #[test]
    fn test_clean_label_collapses_whitespace_and_trims() {
        assert_eq!(clean_label("  Вологість ,   % "), "Вологість , %");
        assert_eq!(clean_label("Тиск,\t\nкПа"), "Тиск, кПа");
    }

    #[test]
    fn test_clean_label_decodes_numeric_entities() {
        assert_eq!(clean_label("пил &#8211; PM"), "пил – PM");
        assert_eq!(clean_label("кут &#x00B0;"), "кут °");
    }

    #[test]
    fn test_clean_label_leaves_bare_ampersand_alone() {
        assert_eq!(clean_label("A & B"), "A & B");
        assert_eq!(clean_label("A &notanentity; B"), "A &notanentity; B");
    }

    #[test]
    fn test_clean_label_plain_text_passes_through() {
        assert_eq!(clean_label("Температура повітря, °С"), "Температура повітря, °С");
    }

    #[test]
    fn test_clean_label_is_idempotent_over_upstream_samples() {
        for (raw, _) in upstream_label_samples() {
            let once = clean_label(raw);
            let twice = clean_label(&once);
            assert_eq!(once, twice, "clean_label not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_clean_label_idempotent_on_entity_encoded_markup() {
        // Upstream occasionally double-encodes markup; decoding must not
        // leave behind tags that only a second cleaning would remove.
        let raw = "&lt;b&gt;ТЧ2,5&lt;/b&gt;,&nbsp;мкг/м&lt;sup&gt;3&lt;/sup&gt;";
        let once = clean_label(raw);
        assert_eq!(once, "ТЧ2,5, мкг/м3");
        assert_eq!(clean_label(&once), once);
        assert_eq!(classify(raw), Some(Channel::Pm25));
    }

    #[test]
    fn test_clean_label_handles_unterminated_tag() {
        assert_eq!(clean_label("Тиск, <sup"), "Тиск,");
    }

    // --- classify -----------------------------------------------------------

    #[test]
    fn test_classify_all_upstream_labels_to_expected_channels() {
        for (raw, expected) in upstream_label_samples() {
            assert_eq!(
                classify(raw),
                Some(expected),
                "label {:?} must classify as {:?}",
                raw,
                expected
            );
        }
    }

    #[test]
    fn test_classify_unrelated_text_is_unclassified() {
        assert_eq!(classify("Random Unrelated Text"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_pm10_label_never_classifies_as_pm1() {
        // "ТЧ1" is a substring of "ТЧ10" — table order must shield PM10
        // labels from the shorter PM1 key.
        assert_eq!(classify("ТЧ10,&nbsp;мкг/м<sup>3</sup>"), Some(Channel::Pm10));
        assert_eq!(classify("ТЧ2,5,&nbsp;мкг/м<sup>3</sup>"), Some(Channel::Pm25));
    }

    #[test]
    fn test_table_order_puts_specific_particulate_keys_first() {
        // Audit the only intra-table containment: every key that contains
        // another key must come before it.
        let keys: Vec<&str> = CHANNEL_NAME_TABLE.iter().map(|(k, _)| *k).collect();
        for (i, ki) in keys.iter().enumerate() {
            for (j, kj) in keys.iter().enumerate() {
                if i != j && ki.contains(kj) {
                    assert!(
                        i < j,
                        "key {:?} contains {:?} but is tested after it",
                        ki,
                        kj
                    );
                }
            }
        }
    }

    #[test]
    fn test_table_covers_every_channel_exactly_once() {
        let mut seen = std::collections::HashSet::new();
        for (_, channel) in CHANNEL_NAME_TABLE {
            assert!(seen.insert(*channel), "channel {:?} mapped twice", channel);
        }
        assert_eq!(seen.len(), Channel::ALL.len());
    }

    // --- descriptors --------------------------------------------------------

    #[test]
    fn test_descriptors_align_with_channel_order() {
        assert_eq!(CHANNEL_DESCRIPTORS.len(), Channel::ALL.len());
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(
                CHANNEL_DESCRIPTORS[i].channel, *channel,
                "descriptor at index {} does not match Channel::ALL order",
                i
            );
        }
    }

    #[test]
    fn test_descriptor_for_returns_matching_row() {
        for channel in Channel::ALL {
            assert_eq!(descriptor_for(channel).channel, channel);
        }
        assert_eq!(descriptor_for(Channel::Co).name, "Carbon Monoxide");
        assert_eq!(descriptor_for(Channel::Pressure).unit, "hPa");
    }

    #[test]
    fn test_only_wind_direction_lacks_a_device_class() {
        for d in CHANNEL_DESCRIPTORS {
            if d.channel == Channel::WindDirection {
                assert!(d.device_class.is_none());
            } else {
                assert!(
                    d.device_class.is_some(),
                    "{:?} should carry a device class",
                    d.channel
                );
            }
        }
    }
}
