/// Static metadata for every supported competition: display info, scrape
/// priority and the per-provider routing handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct League {
    pub key: &'static str,
    pub country: &'static str,
    pub display_name: &'static str,
    /// 1 = top competitions, 2 = secondary.
    pub priority: u8,
    /// Exact Arcadia league-name patterns (lowercase).
    pub pinnacle_patterns: &'static [&'static str],
    /// Kambi listView path.
    pub jacks_path: &'static str,
    /// TOTO competition selection id.
    pub toto_id: &'static str,
}

pub const LEAGUES: &[League] = &[
    // Netherlands
    League {
        key: "eredivisie",
        country: "Netherlands",
        display_name: "Eredivisie",
        priority: 1,
        pinnacle_patterns: &["netherlands - eredivisie"],
        jacks_path: "football/netherlands/eredivisie",
        toto_id: "1176",
    },
    League {
        key: "keuken_kampioen_divisie",
        country: "Netherlands",
        display_name: "Keuken Kampioen Divisie",
        priority: 1,
        pinnacle_patterns: &["netherlands - eerste divisie"],
        jacks_path: "football/netherlands/eerste_divisie",
        toto_id: "1053",
    },
    // England
    League {
        key: "premier_league",
        country: "England",
        display_name: "Premier League",
        priority: 1,
        pinnacle_patterns: &["england - premier league"],
        jacks_path: "football/england/premier_league",
        toto_id: "8",
    },
    League {
        key: "championship",
        country: "England",
        display_name: "Championship",
        priority: 2,
        pinnacle_patterns: &["england - championship"],
        jacks_path: "football/england/championship",
        toto_id: "70",
    },
    // Germany
    League {
        key: "bundesliga",
        country: "Germany",
        display_name: "Bundesliga",
        priority: 1,
        pinnacle_patterns: &["germany - bundesliga"],
        jacks_path: "football/germany/bundesliga",
        toto_id: "35",
    },
    League {
        key: "2_bundesliga",
        country: "Germany",
        display_name: "2. Bundesliga",
        priority: 2,
        pinnacle_patterns: &["germany - 2. bundesliga"],
        jacks_path: "football/germany/2_bundesliga",
        toto_id: "44",
    },
    // Spain
    League {
        key: "la_liga",
        country: "Spain",
        display_name: "La Liga",
        priority: 1,
        pinnacle_patterns: &["spain - la liga"],
        jacks_path: "football/spain/la_liga",
        toto_id: "17",
    },
    // Italy
    League {
        key: "serie_a",
        country: "Italy",
        display_name: "Serie A",
        priority: 1,
        pinnacle_patterns: &["italy - serie a"],
        jacks_path: "football/italy/serie_a",
        toto_id: "23",
    },
    // France
    League {
        key: "ligue_1",
        country: "France",
        display_name: "Ligue 1",
        priority: 1,
        pinnacle_patterns: &["france - ligue 1"],
        jacks_path: "football/france/ligue_1",
        toto_id: "34",
    },
    // Belgium
    League {
        key: "jupiler_pro_league",
        country: "Belgium",
        display_name: "Jupiler Pro League",
        priority: 2,
        pinnacle_patterns: &["belgium - jupiler pro league"],
        jacks_path: "football/belgium/jupiler_pro_league",
        toto_id: "9",
    },
    // Portugal
    League {
        key: "primeira_liga",
        country: "Portugal",
        display_name: "Primeira Liga",
        priority: 2,
        pinnacle_patterns: &["portugal - liga portugal", "portugal - primeira liga"],
        jacks_path: "football/portugal/primeira_liga",
        toto_id: "42",
    },
];

pub fn get_league(key: &str) -> Option<&'static League> {
    LEAGUES.iter().find(|l| l.key == key)
}

/// Leagues whose priority falls in `min_priority..=max_priority`,
/// in table order.
pub fn leagues_by_priority(min_priority: u8, max_priority: u8) -> Vec<&'static League> {
    LEAGUES
        .iter()
        .filter(|l| (min_priority..=max_priority).contains(&l.priority))
        .collect()
}

pub fn leagues_by_country(country: &str) -> Vec<&'static League> {
    LEAGUES.iter().filter(|l| l.country == country).collect()
}
