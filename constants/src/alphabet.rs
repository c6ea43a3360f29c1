//! Nucleotide lookup tables shared by the position mapper and the output writer.

/// Alphabet entry with its spiral offset class and display colour
pub struct BaseInfo {
    pub symbol: u8,
    pub index: u8,
    pub color: [f32; 3],
}

pub const BASE_MAP: &[BaseInfo] = &[
    BaseInfo {
        symbol: b'A',
        index: 0,
        color: [1.0, 0.0, 0.0], // adenine, red
    },
    BaseInfo {
        symbol: b'C',
        index: 1,
        color: [0.0, 1.0, 0.0], // cytosine, green
    },
    BaseInfo {
        symbol: b'G',
        index: 2,
        color: [0.0, 0.0, 1.0], // guanine, blue
    },
    BaseInfo {
        symbol: b'T',
        index: 3,
        color: [1.0, 1.0, 0.0], // thymine, yellow
    },
];

/// Offset class for N and every symbol outside the table
pub const WILDCARD_INDEX: u8 = 4;

/// Neutral gray for N and every symbol outside the table
pub const WILDCARD_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

fn lookup(symbol: u8) -> Option<&'static BaseInfo> {
    let upper = symbol.to_ascii_uppercase();
    BASE_MAP.iter().find(|b| b.symbol == upper)
}

/// Offset class of a symbol, case-insensitive
pub fn base_index(symbol: u8) -> u8 {
    lookup(symbol).map_or(WILDCARD_INDEX, |b| b.index)
}

/// Display colour of a symbol, case-insensitive
pub fn base_color(symbol: u8) -> [f32; 3] {
    lookup(symbol).map_or(WILDCARD_COLOR, |b| b.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_bases_map_to_their_class() {
        assert_eq!(base_index(b'A'), 0);
        assert_eq!(base_index(b'c'), 1);
        assert_eq!(base_index(b'G'), 2);
        assert_eq!(base_index(b't'), 3);
        assert_eq!(base_color(b'g'), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_symbols_fall_back_to_wildcard() {
        for symbol in [b'N', b'n', b'R', b'-', b'*', 0xFF] {
            assert_eq!(base_index(symbol), WILDCARD_INDEX);
            assert_eq!(base_color(symbol), WILDCARD_COLOR);
        }
    }
}
