#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Ko,
}

/// Every user-facing string the client shows, for one locale.
#[derive(Debug)]
pub struct LocaleTable {
    pub app_title: &'static str,
    pub app_subtitle: &'static str,
    pub label_game_name: &'static str,
    pub label_tag_line: &'static str,
    pub label_server: &'static str,
    pub search_button: &'static str,
    pub searching_button: &'static str,
    pub idle_hint: &'static str,
    pub loading_matches: &'static str,
    pub loading_analysis: &'static str,
    pub recent_matches_for: &'static str,
    pub no_matches: &'static str,
    pub victory: &'static str,
    pub defeat: &'static str,
    pub back_to_matches: &'static str,
    pub blue_team: &'static str,
    pub red_team: &'static str,
    pub team_avg_mii: &'static str,
    pub verdict_balanced: &'static str,
    pub verdict_slight: &'static str,
    pub verdict_significant: &'static str,
    pub detail_balanced: &'static str,
    pub detail_slight_blue: &'static str,
    pub detail_slight_red: &'static str,
    pub detail_significant_blue: &'static str,
    pub detail_significant_red: &'static str,
    pub error_label: &'static str,
    pub error_hint: &'static str,
    pub fallback_fetch_matches: &'static str,
    pub fallback_analyze_match: &'static str,
    pub network_error: &'static str,
    pub missing_game_name: &'static str,
    pub missing_tag_line: &'static str,
    pub footer_idle: &'static str,
    pub footer_form: &'static str,
    pub footer_matches: &'static str,
    pub footer_analysis: &'static str,
    pub footer_busy: &'static str,
    pub console_title: &'static str,
    pub no_activity: &'static str,
    pub help_title: &'static str,
    pub help_body: &'static str,
}

pub static EN: LocaleTable = LocaleTable {
    app_title: "LoL MII Analyzer",
    app_subtitle: "Match Integrity Index - Analyze Your League Games",
    label_game_name: "Summoner Name",
    label_tag_line: "Tag Line",
    label_server: "Server",
    search_button: "Search",
    searching_button: "Searching...",
    idle_hint: "Press / to search for a summoner",
    loading_matches: "Loading recent matches...",
    loading_analysis: "Analyzing match...",
    recent_matches_for: "Recent Matches for",
    no_matches: "No recent ranked matches",
    victory: "Victory",
    defeat: "Defeat",
    back_to_matches: "Back to Matches",
    blue_team: "Blue Team",
    red_team: "Red Team",
    team_avg_mii: "Team Avg MII",
    verdict_balanced: "Balanced Match",
    verdict_slight: "Slight Imbalance",
    verdict_significant: "Significant Imbalance",
    detail_balanced: "Both teams had similar match integrity.",
    detail_slight_blue: "Blue team had slightly better teammates.",
    detail_slight_red: "Red team had slightly better teammates.",
    detail_significant_blue: "Blue team had significantly better teammates.",
    detail_significant_red: "Red team had significantly better teammates.",
    error_label: "Error",
    error_hint: "Press / to start a new search",
    fallback_fetch_matches: "Failed to fetch matches",
    fallback_analyze_match: "Failed to analyze match",
    network_error: "Network error. Please try again.",
    missing_game_name: "Enter a summoner name",
    missing_tag_line: "Enter a tag line",
    footer_idle: "/ Search | g Language | ? Help | q Quit",
    footer_form: "Tab Field | ←/→ Server | Enter Search | Esc Close",
    footer_matches: "j/k/↑/↓ Move | Enter Analyze | / Search | g Language | ? Help | q Quit",
    footer_analysis: "b/Esc Back | / Search | g Language | ? Help | q Quit",
    footer_busy: "/ Search | g Language | q Quit",
    console_title: "Console",
    no_activity: "No activity yet",
    help_title: "Help",
    help_body: "Global:
  /            Search form
  g            Language
  ?            Toggle help
  q            Quit

Search form:
  Tab          Next field
  ←/→          Cycle server
  Enter        Search
  Esc          Close form

Matches:
  j/k or ↑/↓   Move
  Enter        Analyze match
  b / Esc      Back to matches",
};

pub static KO: LocaleTable = LocaleTable {
    app_title: "LoL MII 분석기",
    app_subtitle: "매치 무결성 지수 - 리그 게임 분석",
    label_game_name: "소환사 이름",
    label_tag_line: "태그",
    label_server: "서버",
    search_button: "검색",
    searching_button: "검색 중...",
    idle_hint: "/ 키를 눌러 소환사를 검색하세요",
    loading_matches: "최근 경기 불러오는 중...",
    loading_analysis: "경기 분석 중...",
    recent_matches_for: "최근 경기:",
    no_matches: "최근 랭크 경기가 없습니다",
    victory: "승리",
    defeat: "패배",
    back_to_matches: "경기 목록으로",
    blue_team: "블루 팀",
    red_team: "레드 팀",
    team_avg_mii: "팀 평균 MII",
    verdict_balanced: "균형 잡힌 경기",
    verdict_slight: "약간의 불균형",
    verdict_significant: "심각한 불균형",
    detail_balanced: "양 팀의 경기 무결성이 비슷했습니다.",
    detail_slight_blue: "블루 팀의 팀원 구성이 약간 더 유리했습니다.",
    detail_slight_red: "레드 팀의 팀원 구성이 약간 더 유리했습니다.",
    detail_significant_blue: "블루 팀의 팀원 구성이 훨씬 더 유리했습니다.",
    detail_significant_red: "레드 팀의 팀원 구성이 훨씬 더 유리했습니다.",
    error_label: "오류",
    error_hint: "/ 키를 눌러 다시 검색하세요",
    fallback_fetch_matches: "경기 목록을 불러오지 못했습니다",
    fallback_analyze_match: "경기를 분석하지 못했습니다",
    network_error: "네트워크 오류입니다. 다시 시도해 주세요.",
    missing_game_name: "소환사 이름을 입력하세요",
    missing_tag_line: "태그를 입력하세요",
    footer_idle: "/ 검색 | g 언어 | ? 도움말 | q 종료",
    footer_form: "Tab 항목 | ←/→ 서버 | Enter 검색 | Esc 닫기",
    footer_matches: "j/k/↑/↓ 이동 | Enter 분석 | / 검색 | g 언어 | ? 도움말 | q 종료",
    footer_analysis: "b/Esc 뒤로 | / 검색 | g 언어 | ? 도움말 | q 종료",
    footer_busy: "/ 검색 | g 언어 | q 종료",
    console_title: "콘솔",
    no_activity: "아직 활동이 없습니다",
    help_title: "도움말",
    help_body: "전체:
  /            검색 양식
  g            언어 변경
  ?            도움말 전환
  q            종료

검색 양식:
  Tab          다음 필드
  ←/→          서버 변경
  Enter        검색
  Esc          양식 닫기

매치 목록:
  j/k 또는 ↑/↓ 이동
  Enter        매치 분석
  b / Esc      매치 목록으로",
};

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ko];

    pub fn table(self) -> &'static LocaleTable {
        match self {
            Locale::En => &EN,
            Locale::Ko => &KO,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ko => "한국어",
        }
    }

    /// Accepts a bare language code or a tagged one (`ko-KR`, `en_US`).
    pub fn from_code(raw: &str) -> Option<Self> {
        let lang = raw.trim().split(['-', '_']).next().unwrap_or_default();
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(lang))
    }

    pub fn next(self) -> Self {
        match self {
            Locale::En => Locale::Ko,
            Locale::Ko => Locale::En,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_code_reads_language_subtag() {
        assert_eq!(Locale::from_code("ko-KR"), Some(Locale::Ko));
        assert_eq!(Locale::from_code("EN_us"), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
    }

    #[test]
    fn tables_differ_per_locale() {
        assert_ne!(Locale::En.table().verdict_slight, Locale::Ko.table().verdict_slight);
        assert_ne!(Locale::En.table().network_error, Locale::Ko.table().network_error);
    }

    #[test]
    fn chrome_text_is_localized() {
        let (en, ko) = (Locale::En.table(), Locale::Ko.table());
        assert_ne!(en.console_title, ko.console_title);
        assert_ne!(en.no_activity, ko.no_activity);
        assert_ne!(en.help_title, ko.help_title);
        assert_ne!(en.help_body, ko.help_body);
        // Same key rows in both help screens.
        assert_eq!(en.help_body.lines().count(), ko.help_body.lines().count());
    }
}
