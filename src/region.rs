use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum ServerCode {
    #[default]
    NA,
    EUW,
    EUNE,
    KR,
    JP,
    BR,
    LAN,
    LAS,
    OCE,
    TR,
    RU,
    PH,
    SG,
    TH,
    TW,
    VN,
}

impl ServerCode {
    pub const ALL: [ServerCode; 16] = [
        ServerCode::NA,
        ServerCode::EUW,
        ServerCode::EUNE,
        ServerCode::KR,
        ServerCode::JP,
        ServerCode::BR,
        ServerCode::LAN,
        ServerCode::LAS,
        ServerCode::OCE,
        ServerCode::TR,
        ServerCode::RU,
        ServerCode::PH,
        ServerCode::SG,
        ServerCode::TH,
        ServerCode::TW,
        ServerCode::VN,
    ];

    /// Wire identifier sent as the `server` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            ServerCode::NA => "NA",
            ServerCode::EUW => "EUW",
            ServerCode::EUNE => "EUNE",
            ServerCode::KR => "KR",
            ServerCode::JP => "JP",
            ServerCode::BR => "BR",
            ServerCode::LAN => "LAN",
            ServerCode::LAS => "LAS",
            ServerCode::OCE => "OCE",
            ServerCode::TR => "TR",
            ServerCode::RU => "RU",
            ServerCode::PH => "PH",
            ServerCode::SG => "SG",
            ServerCode::TH => "TH",
            ServerCode::TW => "TW",
            ServerCode::VN => "VN",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ServerCode::NA => "North America",
            ServerCode::EUW => "Europe West",
            ServerCode::EUNE => "Europe Nordic & East",
            ServerCode::KR => "Korea",
            ServerCode::JP => "Japan",
            ServerCode::BR => "Brazil",
            ServerCode::LAN => "Latin America North",
            ServerCode::LAS => "Latin America South",
            ServerCode::OCE => "Oceania",
            ServerCode::TR => "Turkey",
            ServerCode::RU => "Russia",
            ServerCode::PH => "Philippines",
            ServerCode::SG => "Singapore",
            ServerCode::TH => "Thailand",
            ServerCode::TW => "Taiwan",
            ServerCode::VN => "Vietnam",
        }
    }

    pub fn from_code(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|server| server.code().eq_ignore_ascii_case(raw))
    }

    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|server| *server == self)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_code_is_case_insensitive_and_closed() {
        assert_eq!(ServerCode::from_code("kr"), Some(ServerCode::KR));
        assert_eq!(ServerCode::from_code(" EUNE "), Some(ServerCode::EUNE));
        assert_eq!(ServerCode::from_code("PBE"), None);
        assert_eq!(ServerCode::from_code(""), None);
    }

    #[test]
    fn cycling_wraps_both_ways() {
        assert_eq!(ServerCode::VN.next(), ServerCode::NA);
        assert_eq!(ServerCode::NA.prev(), ServerCode::VN);
        let mut server = ServerCode::NA;
        for _ in 0..ServerCode::ALL.len() {
            server = server.next();
        }
        assert_eq!(server, ServerCode::NA);
    }
}
