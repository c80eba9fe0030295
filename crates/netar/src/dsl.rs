//! DSL emitter.
//!
//! Renders a [`Network`] as topology source that parses back to an equal
//! network. Devices and links keep their IR order; each nesting level is
//! indented by four spaces.

use std::borrow::Cow;

use log::debug;

use netar_core::{Address, Device, Interface, Link, Network};

const INDENT: &str = "    ";

/// Render a network as DSL text, ending with a newline.
///
/// `power off` is the default and is left out. DHCP interfaces are written
/// as `ip dhcp`. Names and values that would not lex as a single bare word
/// are quoted.
pub fn emit(network: &Network) -> String {
    let mut out = Emitter::default();

    out.line(0, format!("network {} {{", name(network.name())));
    for device in network.devices() {
        out.device(device);
    }
    for link in network.links() {
        out.link(link);
    }
    out.line(0, "}");

    debug!(bytes = out.buffer.len(); "DSL emitted");
    out.buffer
}

#[derive(Default)]
struct Emitter {
    buffer: String,
}

impl Emitter {
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        for _ in 0..depth {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(text.as_ref());
        self.buffer.push('\n');
    }

    fn device(&mut self, device: &Device) {
        self.line(
            1,
            format!("device {} {} {{", name(&device.name), name(device.kind.as_str())),
        );
        self.line(
            2,
            format!(
                "coordinates {} {}",
                device.coordinates.x, device.coordinates.y
            ),
        );
        if device.power {
            self.line(2, "power on");
        }
        for interface in &device.interfaces {
            self.interface(interface);
        }
        self.line(1, "}");
    }

    fn interface(&mut self, interface: &Interface) {
        self.line(2, format!("interface {} {{", name(&interface.name)));
        match interface.address {
            Address::Ipv4(addr) => self.line(3, format!("ip {addr}")),
            Address::Dhcp => self.line(3, "ip dhcp"),
        }
        self.line(3, format!("bandwidth {}", interface.bandwidth));
        self.line(2, "}");
    }

    fn link(&mut self, link: &Link) {
        let header = format!(
            "link {}.{} -> {}.{}",
            name(&link.from.device),
            name(&link.from.port),
            name(&link.to.device),
            name(&link.to.port),
        );

        if link.properties.is_empty() {
            self.line(1, format!("{header} {{ }}"));
            return;
        }

        self.line(1, format!("{header} {{"));
        for (key, value) in &link.properties {
            self.line(2, format!("{} {}", name(key), property_value(value)));
        }
        self.line(1, "}");
    }
}

/// A name as a bare word when it lexes as one, otherwise quoted.
fn name(text: &str) -> Cow<'_, str> {
    if is_bare_word(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(quote(text))
    }
}

/// Property values may also be bare numbers.
fn property_value(text: &str) -> Cow<'_, str> {
    if is_bare_word(text) || is_plain_number(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(quote(text))
    }
}

/// `[A-Za-z_][A-Za-z0-9_/-]*`
fn is_bare_word(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | '-'))
}

/// `-?[0-9]+(\.[0-9]+)?`
fn is_plain_number(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match digits.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(digits),
    }
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
