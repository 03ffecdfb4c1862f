//! Citrix NetScaler application firewall logs in CEF.
//!
//! Options: `{ "seed": 42 }`, or nothing at all.

use std::net::Ipv4Addr;

use chrono::{DateTime, Datelike, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GeneratorError;
use crate::generator::{parse_options, Generator, GeneratorRegistry, ValidateOptions};
use crate::random;
use crate::template::{FunctionSet, TemplateEngine, TemplateId};

// Field meanings follow the NetScaler CEF log component reference and the
// application firewall logging guide.

/// Registry identifier.
pub const NAME: &str = "citrix:cef";

const APPFW: &str = r#"{{ strftime(timestamp, time_layout) }} <{{ facility }}.{{ priority }}> {{ addr }} CEF:{{ cef_version }}|{{ vendor }}|{{ product }}|{{ version }}|{{ module }}|{{ violation }}|{{ severity }}|src={{ src_addr }} {% if geo %}geolocation={{ geolocation(geo) }} {% endif %}spt={{ src_port }} method={{ method }} request={{ request }} msg={{ message }} cn1={{ event_id }} cn2={{ tx_id }} cs1={{ profile }} cs2={{ ppe_id }} cs3={{ session_id }} cs4={{ severity_label }} cs5={{ itoa(year) }} {% if violation_category %}cs6={{ violation_category }} {% endif %}act={{ action }}"#;

const TEMPLATES: [(&str, &str); 1] = [("appfw", APPFW)];

/// Syslog timestamp layouts, with and without a zero-padded day.
pub(crate) const TIME_LAYOUTS: [&str; 2] = ["%b %d %H:%M:%S", "%b %-d %H:%M:%S"];

pub(crate) const FACILITIES: [&str; 20] = [
    "auth", "authpriv", "cron", "daemon", "kern", "lpr", "mail", "mark", "news", "syslog",
    "user", "uucp", "local0", "local1", "local2", "local3", "local4", "local5", "local6",
    "local7",
];

pub(crate) const PRIORITIES: [&str; 11] = [
    "debug", "info", "notice", "warning", "warn", "err", "error", "crit", "alert", "emerg",
    "panic",
];

pub(crate) const VENDORS: [&str; 1] = ["Citrix"];

pub(crate) const PRODUCTS: [&str; 1] = ["NetScaler"];

pub(crate) const VERSIONS: [&str; 2] = ["NS10.0", "NS11.0"];

pub(crate) const MODULES: [&str; 1] = ["APPFW"];

pub(crate) const VIOLATIONS: [&str; 5] = [
    "APPFW_FIELDCONSISTENCY",
    "APPFW_SAFECOMMERCE",
    "APPFW_SAFECOMMERCE_XFORM",
    "APPFW_SIGNATURE_MATCH",
    "APPFW_STARTURL",
];

/// Client locations; empty means the appliance had no geolocation for the source.
pub(crate) const LOCATIONS: [&str; 149] = [
    "", "Unknown", "NorthAmerica.Altimoria.Corvax.CityCenter",
    "NorthAmerica.Florensia.Novath.TremorValley", "NorthAmerica.Gallania.Rovento.Sunridge",
    "NorthAmerica.Baltoria.Velzora.PolarisHeights", "NorthAmerica.Novadia.Quivera.FlamingRidge",
    "NorthAmerica.Xandria.Velmos.Riverstone", "NorthAmerica.Kestoria.Yalvaz.CrimsonHill",
    "NorthAmerica.Vollara.Zendar.AuroraPeaks", "NorthAmerica.Quintara.Pallaxa.SilverLake",
    "NorthAmerica.Morovia.Korvath.SolarisPlains", "NorthAmerica.Serenia.Ryland.Stormview",
    "NorthAmerica.Zyrenthia.Vortak.Ironcliff", "NorthAmerica.Valoria.Draconis.WildroseGlen",
    "NorthAmerica.Tarvonia.Felwind.ShadowGrove", "NorthAmerica.Lorasia.Velthra.Sunspire",
    "NorthAmerica.Talvaxia.Balaria.CrimsonFalls", "NorthAmerica.Elandria.Kovoria.Glintwood",
    "NorthAmerica.Orlanta.Zandor.Mistvale", "NorthAmerica.Valteris.Xanoris.ThunderValley",
    "NorthAmerica.Morlonia.Phaedra.EchoHaven", "NorthAmerica.Theria.Vestoria.TremorHollow",
    "NorthAmerica.Zarvath.Mystara.Glintwood", "NorthAmerica.Kalandor.Volvax.Silverstrand",
    "NorthAmerica.Olivar.Ventara.CrimsonMesa", "NorthAmerica.Theronia.Pyrax.ThunderRidge",
    "NorthAmerica.Veloria.Zyros.Moonshadow", "NorthAmerica.Zovaris.Korvax.Stormcrest",
    "NorthAmerica.Valentia.Rivenor.Sunblade", "NorthAmerica.Zeltria.Orex.Shadowridge",
    "NorthAmerica.Voronia.Xelthra.Thunderpeak", "SouthAmerica.Viridia.Malothia.JadeHollow",
    "SouthAmerica.Malandria.Aurelia.PhoenixBay", "SouthAmerica.Valcoria.Lorvia.EmeraldIsle",
    "SouthAmerica.Aronya.Valeria.MysticFalls", "SouthAmerica.Celestia.Palvoria.EbonyVale",
    "SouthAmerica.Zorvia.Sarath.TalonCliffs", "SouthAmerica.Celentis.Volara.Dreamshade",
    "SouthAmerica.Valthera.Tarvora.CrimsonCove", "SouthAmerica.Xanthia.Theros.MysticGrove",
    "SouthAmerica.Selveria.Pyros.Riverwind", "SouthAmerica.Volthea.Arventis.ShadowGlen",
    "SouthAmerica.Eldoria.Lithara.Thunderstone", "SouthAmerica.Korvax.Talora.Sunspire",
    "SouthAmerica.Vyxoria.Zandros.Shadowvale", "SouthAmerica.Pyronia.Volcath.SilentHill",
    "SouthAmerica.Zylandria.Orvath.CrimsonBay", "SouthAmerica.Valtheris.Vorlon.Suncrest",
    "SouthAmerica.Xylandria.Antaris.EchoValley", "SouthAmerica.Novanta.Pallaxa.LunarGrove",
    "SouthAmerica.Quilara.Talvos.StormBluff", "SouthAmerica.Vandora.Valzor.SilverStream",
    "SouthAmerica.Xyvronia.Lithara.MysticCove", "SouthAmerica.Selvoria.Vorvath.ThunderGlen",
    "SouthAmerica.Valencia.Orvalon.Rivercrest", "SouthAmerica.Xylothia.Zentar.GlintRidge",
    "SouthAmerica.Voloria.Sylvara.TwilightPeak", "Europe.Maldera.Quinthra.Shadowpeak",
    "Europe.Talvoria.Aurex.LunarHollow", "Europe.Valtoria.Xelara.SunfallGlen",
    "Europe.Xylandria.Korinox.StormCrest", "Europe.Ceridia.Vandor.SilverGrove",
    "Europe.Kytheria.Zorthal.Ravenridge", "Europe.Zypheria.Malvora.Sunwood",
    "Europe.Volaxia.Talendria.Moonstone", "Europe.Karvoria.Vorlon.EchoMesa",
    "Europe.Thalandia.Zaltor.Sunridge", "Europe.Vantoria.Syldor.CrimsonHollow",
    "Europe.Xantheas.Oltar.Stormwind", "Europe.Quinthia.Aetheris.ThunderCliff",
    "Europe.Rovinthar.Zyros.CrimsonGlade", "Europe.Selveris.Vorath.MoonBluff",
    "Europe.Talvora.Zyloth.Glintwood", "Europe.Valtheris.Vorath.MysticHaven",
    "Europe.Zelvoris.Altira.Silverthorn", "Europe.Valthera.Kylos.Sunspire",
    "Europe.Xyphera.Voltara.ShadowMire", "Europe.Celathra.Tharvos.MysticCove",
    "Europe.Theronis.Orvax.CrimsonPeak", "Europe.Selvorn.Korvath.ThunderBay",
    "Europe.Zantheria.Voloria.SilverMesa", "Europe.Xyrelia.Talvora.RavenGlen",
    "Europe.Valoria.Zelthra.Moonrise", "Europe.Quinthara.Olthera.SilverLake",
    "Europe.Zoltara.Ryvon.ThunderHill", "Europe.Selvoris.Vorland.Suncrest",
    "Europe.Theronix.Xarvath.CrimsonRidge", "Europe.Korvaris.Valthros.StormBay",
    "Europe.Valdoria.Quinthos.EchoGrove", "Africa.Voltheon.Zoltris.Suncrest",
    "Africa.Thalvaria.Ravinthar.LunarHollow", "Africa.Valoria.Xalvath.ThunderPlains",
    "Africa.Zorvath.Selenor.Silverpeak", "Africa.Vandora.Kylandar.MysticRidge",
    "Africa.Quinthar.Valthoria.Stormshade", "Africa.Xylothar.Vorath.SunValley",
    "Africa.Zelandia.Theronis.CrimsonCove", "Africa.Vantheon.Selvos.Moonspire",
    "Africa.Therondar.Volaria.ShadowGrove", "Africa.Valdoria.Altira.LunarBay",
    "Africa.Selvoria.Xylandor.Glintwood", "Africa.Xyronia.Valtheris.Sunridge",
    "Africa.Quinthar.Voltara.ThunderGrove", "Africa.Valterra.Olthoria.CrimsonBluff",
    "Africa.Xalvoria.Zorath.MysticPeak", "Africa.Thalvaris.Zanthon.Sunstone",
    "Africa.Rovinthar.Vantoria.EchoRidge", "Africa.Selthara.Zorvath.SilverCrest",
    "Africa.Xylandra.Valdoria.MoonRidge", "Africa.Valtheris.Zolvaris.ShadowValley",
    "Africa.Vorlonia.Thalvaris.Thunderstone", "Africa.Xalvaris.Zeltria.Sunbluff",
    "Africa.Vandaria.Rovinthar.GlintPeak", "Africa.Thalvath.Xoltris.SilverVale",
    "Africa.Valdaria.Sylvoris.MoonCrest", "Africa.Seltheris.Voltrax.CrimsonHill",
    "Africa.Valtheris.Rovinthor.SunGrove", "Africa.Xarvath.Zorvinth.StormValley",
    "Africa.Kylandor.Valthros.Glintstone", "Africa.Sylvoria.Zelvath.MoonGlen",
    "Asia.Valdoria.Tharvos.SunGrove", "Asia.Xelthar.Vorlon.Moonshade",
    "Asia.Zantheria.Vorath.StormVale", "Asia.Valtheris.Selvath.ThunderCrest",
    "Asia.Tharvath.Xoltria.Sunbluff", "Asia.Zolvaris.Valthros.ShadowGrove",
    "Asia.Xarvath.Selvorn.Moonstone", "Asia.Voltaris.Zeltria.GlintRidge",
    "Asia.Seltharis.Valoria.Sunwood", "Asia.Valtoris.Thalvath.MysticGrove",
    "Asia.Zarvath.Xelvos.CrimsonPeak", "Asia.Volaris.Tharvon.Shadowvale",
    "Asia.Xelvoris.Valtheria.SilverGlen", "Asia.Valdoria.Zorvath.LunarHollow",
    "Asia.Xylandar.Valvoria.Sunstone", "Asia.Theronis.Voltrax.Glintwood",
    "Asia.Zeltria.Valtoria.StormGlen", "Asia.Vanthara.Tharvath.ThunderBay",
    "Asia.Selthra.Zoltrax.Moonridge", "Asia.Valtheria.Zarvath.Sunbluff",
    "Asia.Xoltria.Volaria.SilverBay", "Asia.Theronis.Valdaria.Shadowstone",
    "Asia.Valvoria.Zyloth.SunVale", "Asia.Xantheria.Thalvath.Moonstone",
    "Asia.Zarvath.Valthros.GlintGlen", "Asia.Vorathia.Xelthros.Suncrest",
    "Asia.Selvoria.Zolvaris.CrimsonHill", "Asia.Valdoris.Theronis.MoonGrove",
];

pub(crate) const METHODS: [&str; 2] = ["GET", "POST"];

pub(crate) const REQUESTS: [&str; 7] = [
    "http://aaron.stratum8.net/FFC/login.html",
    "http://aaron.stratum8.net/FFC/login.php?login_name=abc&passwd=123456789234&drinking_pref=on&text_area=&loginButton=ClickToLogin&as_sfid=AAAAAAWIahZuYoIFbjBhYMP05mJLTwEfIY0a7AKGMg3jIBaKmwtK4t7M7lNxOgj7Gmd3SZc8KUj6CR6a7W5kIWDRHN8PtK1Zc-txHkHNx1WknuG9DzTuM7t1THhluevXu9I4kp8%3D&as_fid=feeec8758b41740eedeeb6b35b85dfd3d5def30c",
    "http://aaron.stratum8.net/FFC/wwwboard/passwd.txt",
    "http://aaron.stratum8.net/FFC/CreditCardMind.html",
    "http://vpx247.example.net/FFC/CreditCardMind.html",
    r"http://vpx247.example.net/FFC/login_post.html?abc\=def",
    "http://vpx247.example.net/FFC/wwwboard/passwd.txt",
];

pub(crate) const MESSAGES: [&str; 5] = [
    "Signature violation rule ID 807: web-cgi /wwwboard/passwd.txt access",
    "Disallow Illegal URL.",
    "Transformed (xout) potential credit card numbers seen in server response",
    "Maximum number of potential credit card numbers seen",
    "Field consistency check failed for field passwd",
];

pub(crate) const PROFILES: [&str; 1] = ["pr_ffc"];

pub(crate) const SEVERITY_LABELS: [&str; 2] = ["INFO", "ALERT"];

pub(crate) const VIOLATION_CATEGORIES: [&str; 4] = ["", "web-cgi", "sql-injection", "phishing"];

pub(crate) const ACTIONS: [&str; 3] = ["blocked", "not blocked", "transformed"];

/// Options accepted by the NetScaler CEF format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CefOptions {
    /// Seed for the generator's random source, entropy when unset
    pub seed: Option<u64>,
}

impl ValidateOptions for CefOptions {}

/// Field values for the next CEF line.
#[derive(Debug, Clone, Serialize)]
pub struct CefRecord {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub time_layout: &'static str,
    pub facility: &'static str,
    pub priority: &'static str,
    pub addr: Ipv4Addr,
    pub cef_version: u8,
    pub vendor: &'static str,
    pub product: &'static str,
    pub version: &'static str,
    pub module: &'static str,
    pub violation: &'static str,
    pub severity: u8,
    pub src_addr: Ipv4Addr,
    pub geo: &'static str,
    pub src_port: u16,
    pub method: &'static str,
    pub request: &'static str,
    pub message: &'static str,
    pub event_id: u32,
    pub tx_id: u32,
    pub profile: &'static str,
    pub ppe_id: String,
    pub session_id: String,
    pub severity_label: &'static str,
    pub year: i32,
    pub violation_category: &'static str,
    pub action: &'static str,
}

impl CefRecord {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let timestamp = Utc::now().trunc_subsecs(0);

        Self {
            timestamp,
            time_layout: random::pick(rng, &TIME_LAYOUTS),
            facility: random::pick(rng, &FACILITIES),
            priority: random::pick(rng, &PRIORITIES),
            addr: random::ipv4(rng),
            cef_version: rng.gen_range(0..2),
            vendor: random::pick(rng, &VENDORS),
            product: random::pick(rng, &PRODUCTS),
            version: random::pick(rng, &VERSIONS),
            module: random::pick(rng, &MODULES),
            violation: random::pick(rng, &VIOLATIONS),
            severity: rng.gen_range(1..=10),
            src_addr: random::ipv4(rng),
            geo: random::pick(rng, &LOCATIONS),
            src_port: random::port(rng),
            method: random::pick(rng, &METHODS),
            request: random::pick(rng, &REQUESTS),
            message: random::pick(rng, &MESSAGES),
            event_id: rng.gen_range(0..1000),
            tx_id: rng.gen_range(0..100_000),
            profile: random::pick(rng, &PROFILES),
            ppe_id: format!("PPE{}", rng.gen_range(1..=9)),
            session_id: random::hex_id(rng, 16),
            severity_label: random::pick(rng, &SEVERITY_LABELS),
            year: timestamp.year(),
            violation_category: random::pick(rng, &VIOLATION_CATEGORIES),
            action: random::pick(rng, &ACTIONS),
        }
    }
}

/// NetScaler CEF log line generator.
pub struct CitrixCef {
    record: CefRecord,
    templates: TemplateEngine,
    rng: StdRng,
}

impl CitrixCef {
    /// Build a generator from a JSON options tree.
    pub fn new(options: &serde_json::Value) -> Result<Self, GeneratorError> {
        let options: CefOptions = parse_options(NAME, options)?;
        let templates = TemplateEngine::compile_all(&FunctionSet::standard(), &TEMPLATES)?;

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let record = CefRecord::random(&mut rng);

        debug!(format = NAME, seeded = options.seed.is_some(), "Generator constructed");

        Ok(Self {
            record,
            templates,
            rng,
        })
    }

    pub fn record(&self) -> &CefRecord {
        &self.record
    }

    fn render(&self, id: TemplateId) -> Result<Vec<u8>, GeneratorError> {
        self.templates.render(id, &self.record)
    }
}

impl Generator for CitrixCef {
    fn format(&self) -> &'static str {
        NAME
    }

    fn next(&mut self) -> Result<Vec<u8>, GeneratorError> {
        let id = self
            .templates
            .random_id(&mut self.rng)
            .ok_or_else(|| GeneratorError::config(NAME, "no templates compiled"))?;
        let line = self.render(id)?;
        self.record = CefRecord::random(&mut self.rng);
        Ok(line)
    }
}

fn construct(options: &serde_json::Value) -> Result<Box<dyn Generator>, GeneratorError> {
    Ok(Box::new(CitrixCef::new(options)?))
}

/// Add this format to `registry`.
pub fn register(registry: &mut GeneratorRegistry) {
    registry.register(NAME, construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::HashSet;

    fn seeded(seed: u64) -> CitrixCef {
        CitrixCef::new(&json!({ "seed": seed })).unwrap()
    }

    fn lines(generator: &mut CitrixCef, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| String::from_utf8(generator.next().unwrap()).unwrap())
            .collect()
    }

    /// Text between `start` and the next `end` marker.
    fn between<'a>(line: &'a str, start: &str, end: &str) -> Option<&'a str> {
        let from = line.find(start)? + start.len();
        let rest = &line[from..];
        Some(&rest[..rest.find(end)?])
    }

    fn fixed_record() -> CefRecord {
        CefRecord {
            timestamp: Utc.timestamp_opt(97445, 0).unwrap(),
            time_layout: TIME_LAYOUTS[0],
            facility: "local0",
            priority: "info",
            addr: Ipv4Addr::new(10, 217, 31, 98),
            cef_version: 0,
            vendor: "Citrix",
            product: "NetScaler",
            version: "NS10.0",
            module: "APPFW",
            violation: "APPFW_STARTURL",
            severity: 6,
            src_addr: Ipv4Addr::new(175, 16, 199, 1),
            geo: "Europe.Maldera.Quinthra.Shadowpeak",
            src_port: 54711,
            method: "GET",
            request: "http://vpx247.example.net/FFC/login.html",
            message: "Disallow Illegal URL.",
            event_id: 602,
            tx_id: 0,
            profile: "pr_ffc",
            ppe_id: "PPE1".to_string(),
            session_id: "3f5a1c2b4d6e8f7a9b0c1d2e3f4a5b6c".to_string(),
            severity_label: "ALERT",
            year: 1970,
            violation_category: "",
            action: "not blocked",
        }
    }

    #[test]
    fn test_fixed_record_renders() {
        let mut generator = seeded(1);
        generator.record = fixed_record();
        let id = generator.templates.ids().next().unwrap();

        let line = String::from_utf8(generator.render(id).unwrap()).unwrap();
        assert_eq!(
            line,
            "Jan 02 03:04:05 <local0.info> 10.217.31.98 CEF:0|Citrix|NetScaler|NS10.0|APPFW|APPFW_STARTURL|6|src=175.16.199.1 geolocation=Europe.Maldera.Quinthra.Shadowpeak.*.* spt=54711 method=GET request=http://vpx247.example.net/FFC/login.html msg=Disallow Illegal URL. cn1=602 cn2=0 cs1=pr_ffc cs2=PPE1 cs3=3f5a1c2b4d6e8f7a9b0c1d2e3f4a5b6c cs4=ALERT cs5=1970 act=not blocked"
        );
    }

    #[test]
    fn test_optional_fields_toggle() {
        let mut generator = seeded(2);
        generator.record = CefRecord {
            geo: "",
            violation_category: "web-cgi",
            time_layout: TIME_LAYOUTS[1],
            ..fixed_record()
        };
        let id = generator.templates.ids().next().unwrap();

        let line = String::from_utf8(generator.render(id).unwrap()).unwrap();
        assert!(line.starts_with("Jan 2 03:04:05 "));
        assert!(line.contains("|src=175.16.199.1 spt=54711 "));
        assert!(line.ends_with(" cs5=1970 cs6=web-cgi act=not blocked"));
    }

    #[test]
    fn test_lines_are_single_non_empty() {
        let mut generator = seeded(3);
        for line in lines(&mut generator, 500) {
            assert!(!line.is_empty());
            assert!(!line.contains('\n'));
            assert!(line.contains(" CEF:"));
        }
    }

    #[test]
    fn test_header_fields_stay_in_tables() {
        let mut generator = seeded(4);
        for line in lines(&mut generator, 1000) {
            let header: Vec<&str> = line.splitn(8, '|').collect();
            assert_eq!(header.len(), 8, "{line}");

            let cef_version = header[0].rsplit("CEF:").next().unwrap();
            assert!(cef_version == "0" || cef_version == "1");
            assert!(VENDORS.contains(&header[1]));
            assert!(PRODUCTS.contains(&header[2]));
            assert!(VERSIONS.contains(&header[3]));
            assert!(MODULES.contains(&header[4]));
            assert!(VIOLATIONS.contains(&header[5]));

            let severity: u8 = header[6].parse().unwrap();
            assert!((1..=10).contains(&severity));

            let (facility, priority) = between(&line, "<", ">").unwrap().split_once('.').unwrap();
            assert!(FACILITIES.contains(&facility));
            assert!(PRIORITIES.contains(&priority));
        }
    }

    #[test]
    fn test_extension_fields_stay_in_tables() {
        let mut generator = seeded(5);
        for line in lines(&mut generator, 1000) {
            let port: u32 = between(&line, " spt=", " ").unwrap().parse().unwrap();
            assert!(port <= 65_535);

            assert!(METHODS.contains(&between(&line, " method=", " ").unwrap()));
            assert!(REQUESTS.contains(&between(&line, " request=", " msg=").unwrap()));
            assert!(MESSAGES.contains(&between(&line, " msg=", " cn1=").unwrap()));
            assert!(PROFILES.contains(&between(&line, " cs1=", " ").unwrap()));
            assert!(SEVERITY_LABELS.contains(&between(&line, " cs4=", " ").unwrap()));

            let event_id: u32 = between(&line, " cn1=", " ").unwrap().parse().unwrap();
            assert!(event_id < 1000);
            let tx_id: u32 = between(&line, " cn2=", " ").unwrap().parse().unwrap();
            assert!(tx_id < 100_000);

            let ppe = between(&line, " cs2=", " ").unwrap();
            let ppe_number: u8 = ppe.strip_prefix("PPE").unwrap().parse().unwrap();
            assert!((1..=9).contains(&ppe_number));

            let session = between(&line, " cs3=", " ").unwrap();
            assert_eq!(session.len(), 32);
            assert!(session.chars().all(|c| c.is_ascii_hexdigit()));

            let action = line.rsplit(" act=").next().unwrap();
            assert!(ACTIONS.contains(&action));

            if let Some(category) = between(&line, " cs6=", " act=") {
                assert!(VIOLATION_CATEGORIES[1..].contains(&category));
            }
            if let Some(geo) = between(&line, " geolocation=", " spt=") {
                assert!(LOCATIONS[1..]
                    .iter()
                    .any(|location| crate::template::geolocation(location) == geo));
            }
        }
    }

    #[test]
    fn test_optional_fields_appear_and_disappear() {
        let mut generator = seeded(6);
        let all = lines(&mut generator, 400);
        assert!(all.iter().any(|line| line.contains(" geolocation=")));
        assert!(all.iter().any(|line| !line.contains(" geolocation=")));
        assert!(all.iter().any(|line| line.contains(" cs6=")));
        assert!(all.iter().any(|line| !line.contains(" cs6=")));
    }

    #[test]
    fn test_record_drawn_in_domain() {
        let mut generator = seeded(7);
        for _ in 0..200 {
            let record = generator.record().clone();
            assert!((1..=10).contains(&record.severity));
            assert!(record.cef_version < 2);
            assert_eq!(record.year, record.timestamp.year());
            assert!(TIME_LAYOUTS.contains(&record.time_layout));
            generator.next().unwrap();
        }
    }

    #[test]
    fn test_lines_are_mostly_distinct() {
        let mut generator = seeded(8);
        let distinct: HashSet<String> = lines(&mut generator, 500).into_iter().collect();
        assert!(distinct.len() > 490, "only {} distinct lines", distinct.len());
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = CitrixCef::new(&json!({ "seed": 1, "vendor": "Acme" })).err().unwrap();
        assert!(matches!(err, GeneratorError::Config { format: NAME, .. }));
    }

    #[test]
    fn test_wrong_option_type_rejected() {
        let err = CitrixCef::new(&json!({ "seed": "forty-two" })).err().unwrap();
        assert!(matches!(err, GeneratorError::Config { .. }));
    }

    #[test]
    fn test_defaults_without_options() {
        let generator = CitrixCef::new(&serde_json::Value::Null).unwrap();
        assert_eq!(generator.format(), NAME);
        assert_eq!(generator.templates.len(), 1);
    }
}
