use std::collections::HashMap;
use std::sync::OnceLock;

use deunicode::deunicode;

/// Alias database: normalized variant -> canonical name.
const TEAM_ALIASES: &[(&str, &str)] = &[
    // Netherlands - Eredivisie
    ("ajax", "ajax"),
    ("afc ajax", "ajax"),
    ("ajax amsterdam", "ajax"),
    ("psv", "psv"),
    ("psv eindhoven", "psv"),
    ("feyenoord", "feyenoord"),
    ("feyenoord rotterdam", "feyenoord"),
    ("az", "az"),
    ("az alkmaar", "az"),
    ("fc twente", "fc twente"),
    ("twente", "fc twente"),
    ("twente enschede", "fc twente"),
    ("fc utrecht", "fc utrecht"),
    ("utrecht", "fc utrecht"),
    ("sc heerenveen", "sc heerenveen"),
    ("heerenveen", "sc heerenveen"),
    ("nac breda", "nac breda"),
    ("nac", "nac breda"),
    ("rkc waalwijk", "rkc waalwijk"),
    ("rkc", "rkc waalwijk"),
    ("pec zwolle", "pec zwolle"),
    ("zwolle", "pec zwolle"),
    ("go ahead eagles", "go ahead eagles"),
    ("ga eagles", "go ahead eagles"),
    ("fortuna sittard", "fortuna sittard"),
    ("fortuna", "fortuna sittard"),
    ("sparta rotterdam", "sparta rotterdam"),
    ("sparta", "sparta rotterdam"),
    ("heracles almelo", "heracles almelo"),
    ("heracles", "heracles almelo"),
    ("willem ii", "willem ii"),
    ("willem ii tilburg", "willem ii"),
    ("nec nijmegen", "nec nijmegen"),
    ("nec", "nec nijmegen"),
    ("n e c nijmegen", "nec nijmegen"),
    ("fc groningen", "fc groningen"),
    ("groningen", "fc groningen"),
    ("almere city", "almere city"),
    ("almere city fc", "almere city"),
    ("excelsior", "excelsior"),
    ("excelsior rotterdam", "excelsior"),
    ("sbv excelsior", "excelsior"),
    // Netherlands - Keuken Kampioen Divisie
    ("fc eindhoven", "fc eindhoven"),
    ("eindhoven", "fc eindhoven"),
    ("fc den bosch", "fc den bosch"),
    ("den bosch", "fc den bosch"),
    ("fc dordrecht", "fc dordrecht"),
    ("dordrecht", "fc dordrecht"),
    ("fc emmen", "fc emmen"),
    ("emmen", "fc emmen"),
    ("fc volendam", "fc volendam"),
    ("volendam", "fc volendam"),
    ("de graafschap", "de graafschap"),
    ("graafschap", "de graafschap"),
    ("sc cambuur", "sc cambuur"),
    ("cambuur", "sc cambuur"),
    ("cambuur leeuwarden", "sc cambuur"),
    ("mvv maastricht", "mvv maastricht"),
    ("mvv", "mvv maastricht"),
    ("ado den haag", "ado den haag"),
    ("ado", "ado den haag"),
    ("helmond sport", "helmond sport"),
    ("helmond", "helmond sport"),
    ("telstar", "telstar"),
    ("sc telstar", "telstar"),
    ("top oss", "top oss"),
    ("oss", "top oss"),
    ("vvv venlo", "vvv venlo"),
    ("venlo", "vvv venlo"),
    ("roda jc", "roda jc"),
    ("roda jc kerkrade", "roda jc"),
    ("roda", "roda jc"),
    // Jong (reserve) teams
    ("jong ajax", "jong ajax"),
    ("ajax ii", "jong ajax"),
    ("jong psv", "jong psv"),
    ("psv ii", "jong psv"),
    ("jong az", "jong az"),
    ("az ii", "jong az"),
    ("jong fc utrecht", "jong fc utrecht"),
    ("fc utrecht ii", "jong fc utrecht"),
    // England - Premier League
    ("manchester united", "manchester united"),
    ("man united", "manchester united"),
    ("man utd", "manchester united"),
    ("manchester city", "manchester city"),
    ("man city", "manchester city"),
    ("liverpool", "liverpool"),
    ("liverpool fc", "liverpool"),
    ("chelsea", "chelsea"),
    ("chelsea fc", "chelsea"),
    ("arsenal", "arsenal"),
    ("arsenal fc", "arsenal"),
    ("tottenham", "tottenham"),
    ("tottenham hotspur", "tottenham"),
    ("spurs", "tottenham"),
    ("newcastle", "newcastle"),
    ("newcastle united", "newcastle"),
    ("aston villa", "aston villa"),
    ("villa", "aston villa"),
    ("brighton", "brighton"),
    ("brighton & hove albion", "brighton"),
    ("brighton and hove albion", "brighton"),
    ("west ham", "west ham"),
    ("west ham united", "west ham"),
    ("everton", "everton"),
    ("everton fc", "everton"),
    ("crystal palace", "crystal palace"),
    ("palace", "crystal palace"),
    ("fulham", "fulham"),
    ("fulham fc", "fulham"),
    ("brentford", "brentford"),
    ("brentford fc", "brentford"),
    ("nottingham forest", "nottingham forest"),
    ("notts forest", "nottingham forest"),
    ("forest", "nottingham forest"),
    ("wolverhampton", "wolverhampton"),
    ("wolves", "wolverhampton"),
    ("wolverhampton wanderers", "wolverhampton"),
    ("bournemouth", "bournemouth"),
    ("afc bournemouth", "bournemouth"),
    ("leicester", "leicester"),
    ("leicester city", "leicester"),
    ("southampton", "southampton"),
    ("southampton fc", "southampton"),
    ("leeds", "leeds"),
    ("leeds united", "leeds"),
    ("ipswich", "ipswich"),
    ("ipswich town", "ipswich"),
    // Germany - Bundesliga
    ("bayern munich", "bayern munich"),
    ("bayern", "bayern munich"),
    ("fc bayern munchen", "bayern munich"),
    ("borussia dortmund", "borussia dortmund"),
    ("dortmund", "borussia dortmund"),
    ("bvb", "borussia dortmund"),
    ("rb leipzig", "rb leipzig"),
    ("leipzig", "rb leipzig"),
    ("bayer leverkusen", "bayer leverkusen"),
    ("leverkusen", "bayer leverkusen"),
    ("union berlin", "union berlin"),
    ("fc union berlin", "union berlin"),
    ("freiburg", "freiburg"),
    ("sc freiburg", "freiburg"),
    ("eintracht frankfurt", "eintracht frankfurt"),
    ("frankfurt", "eintracht frankfurt"),
    ("vfl wolfsburg", "vfl wolfsburg"),
    ("wolfsburg", "vfl wolfsburg"),
    ("borussia monchengladbach", "borussia monchengladbach"),
    ("monchengladbach", "borussia monchengladbach"),
    ("gladbach", "borussia monchengladbach"),
    ("vfb stuttgart", "vfb stuttgart"),
    ("stuttgart", "vfb stuttgart"),
    ("werder bremen", "werder bremen"),
    ("bremen", "werder bremen"),
    ("hoffenheim", "hoffenheim"),
    ("tsg hoffenheim", "hoffenheim"),
    ("fc augsburg", "fc augsburg"),
    ("augsburg", "fc augsburg"),
    ("mainz", "mainz"),
    ("fsv mainz 05", "mainz"),
    ("mainz 05", "mainz"),
    ("fc koln", "fc koln"),
    ("koln", "fc koln"),
    ("cologne", "fc koln"),
    ("hertha berlin", "hertha berlin"),
    ("hertha bsc", "hertha berlin"),
    // Spain - La Liga
    ("real madrid", "real madrid"),
    ("madrid", "real madrid"),
    ("barcelona", "barcelona"),
    ("fc barcelona", "barcelona"),
    ("barca", "barcelona"),
    ("atletico madrid", "atletico madrid"),
    ("atletico", "atletico madrid"),
    ("sevilla", "sevilla"),
    ("sevilla fc", "sevilla"),
    ("real sociedad", "real sociedad"),
    ("sociedad", "real sociedad"),
    ("real betis", "real betis"),
    ("betis", "real betis"),
    ("villarreal", "villarreal"),
    ("villarreal cf", "villarreal"),
    ("athletic bilbao", "athletic bilbao"),
    ("athletic", "athletic bilbao"),
    ("athletic club", "athletic bilbao"),
    ("valencia", "valencia"),
    ("valencia cf", "valencia"),
    ("getafe", "getafe"),
    ("getafe cf", "getafe"),
    ("osasuna", "osasuna"),
    ("ca osasuna", "osasuna"),
    ("rayo vallecano", "rayo vallecano"),
    ("rayo", "rayo vallecano"),
    ("celta vigo", "celta vigo"),
    ("celta", "celta vigo"),
    ("mallorca", "mallorca"),
    ("rcd mallorca", "mallorca"),
    ("girona", "girona"),
    ("girona fc", "girona"),
    ("las palmas", "las palmas"),
    ("ud las palmas", "las palmas"),
    ("alaves", "alaves"),
    ("deportivo alaves", "alaves"),
    // Italy - Serie A
    ("juventus", "juventus"),
    ("juve", "juventus"),
    ("inter", "inter"),
    ("inter milan", "inter"),
    ("internazionale", "inter"),
    ("ac milan", "ac milan"),
    ("milan", "ac milan"),
    ("napoli", "napoli"),
    ("ssc napoli", "napoli"),
    ("roma", "roma"),
    ("as roma", "roma"),
    ("lazio", "lazio"),
    ("ss lazio", "lazio"),
    ("atalanta", "atalanta"),
    ("atalanta bc", "atalanta"),
    ("fiorentina", "fiorentina"),
    ("acf fiorentina", "fiorentina"),
    ("torino", "torino"),
    ("torino fc", "torino"),
    ("bologna", "bologna"),
    ("bologna fc", "bologna"),
    ("udinese", "udinese"),
    ("udinese calcio", "udinese"),
    ("sassuolo", "sassuolo"),
    ("us sassuolo", "sassuolo"),
    ("monza", "monza"),
    ("ac monza", "monza"),
    ("lecce", "lecce"),
    ("us lecce", "lecce"),
    ("cagliari", "cagliari"),
    ("cagliari calcio", "cagliari"),
    ("hellas verona", "hellas verona"),
    ("verona", "hellas verona"),
    ("salernitana", "salernitana"),
    ("us salernitana", "salernitana"),
    ("empoli", "empoli"),
    ("empoli fc", "empoli"),
    // France - Ligue 1
    ("psg", "psg"),
    ("paris saint germain", "psg"),
    ("paris sg", "psg"),
    ("marseille", "marseille"),
    ("om", "marseille"),
    ("olympique marseille", "marseille"),
    ("lyon", "lyon"),
    ("olympique lyon", "lyon"),
    ("olympique lyonnais", "lyon"),
    ("monaco", "monaco"),
    ("as monaco", "monaco"),
    ("lille", "lille"),
    ("losc lille", "lille"),
    ("rennes", "rennes"),
    ("stade rennais", "rennes"),
    ("nice", "nice"),
    ("ogc nice", "nice"),
    ("lens", "lens"),
    ("rc lens", "lens"),
    ("strasbourg", "strasbourg"),
    ("rc strasbourg", "strasbourg"),
    ("montpellier", "montpellier"),
    ("montpellier hsc", "montpellier"),
    ("nantes", "nantes"),
    ("fc nantes", "nantes"),
    ("reims", "reims"),
    ("stade reims", "reims"),
    ("toulouse", "toulouse"),
    ("toulouse fc", "toulouse"),
    ("brest", "brest"),
    ("stade brestois", "brest"),
    ("le havre", "le havre"),
    ("le havre ac", "le havre"),
    ("lorient", "lorient"),
    ("fc lorient", "lorient"),
    ("clermont", "clermont"),
    ("clermont foot", "clermont"),
    ("metz", "metz"),
    ("fc metz", "metz"),
];

/// Club-form prefixes that providers prepend inconsistently (first token).
const LEGAL_FORM_PREFIXES: &[&str] = &[
    "fc", "sc", "bv", "sv", "vv", "afc", "rk", "pk", "cf", "us", "ac", "as", "ssc", "rc", "og",
    "ca", "ud", "rcd",
];

/// Qualifier suffixes that providers append inconsistently (last token).
const QUALIFIER_SUFFIXES: &[&str] = &[
    "fc",
    "united",
    "city",
    "town",
    "rovers",
    "wanderers",
    "athletic",
    "hotspur",
    "albion",
    "calcio",
    "amsterdam",
    "rotterdam",
    "nl",
];

static ALIAS_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn alias_map() -> &'static HashMap<&'static str, &'static str> {
    ALIAS_MAP.get_or_init(|| TEAM_ALIASES.iter().copied().collect())
}

/// Normalize a team name to its canonical matching form.
///
/// Transliterates to ASCII, lowercases, folds separator punctuation to
/// spaces and collapses whitespace, then resolves through the alias table,
/// retrying once with a known legal-form prefix stripped and once with a
/// known qualifier suffix stripped. Unknown names come back in normalized
/// form; only empty input yields an empty string.
pub fn normalize_team_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let ascii = deunicode(&trimmed.to_lowercase());
    let folded: String = ascii
        .chars()
        .map(|c| match c {
            '.' | '-' | '–' | '—' | '/' | '\'' => ' ',
            other => other,
        })
        .collect();
    let normalized = folded.split_whitespace().collect::<Vec<_>>().join(" ");

    let aliases = alias_map();
    if let Some(canonical) = aliases.get(normalized.as_str()) {
        return (*canonical).to_string();
    }

    if let Some((first, rest)) = normalized.split_once(' ') {
        if LEGAL_FORM_PREFIXES.contains(&first) {
            if let Some(canonical) = aliases.get(rest) {
                return (*canonical).to_string();
            }
        }
    }

    if let Some((rest, last)) = normalized.rsplit_once(' ') {
        if QUALIFIER_SUFFIXES.contains(&last) {
            if let Some(canonical) = aliases.get(rest) {
                return (*canonical).to_string();
            }
        }
    }

    normalized
}

/// Similarity ratio between two (already normalized) team names in
/// `[0.0, 1.0]`: 1.0 for identical strings, 0.0 for fully disjoint ones.
pub fn team_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}
