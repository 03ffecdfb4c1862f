//! Fortinet FortiGate firewall logs.
//!
//! Four record shapes are produced: FSSO user logon events, system events, DNS query
//! UTM logs and forwarded-traffic logs.
//!
//! Options (all optional):
//!
//! ```json
//! { "seed": 42, "timezone": "-0500", "vd": "root" }
//! ```

use std::net::Ipv4Addr;

use chrono::{DateTime, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GeneratorError;
use crate::generator::{parse_options, Generator, GeneratorRegistry, ValidateOptions};
use crate::random;
use crate::template::{FunctionSet, TemplateEngine, TemplateId};

/// Registry identifier.
pub const NAME: &str = "fortinet:firewall";

/// Bytes per packet used to derive `sent_bytes` from `sent_packets`.
const FRAME_SIZE: u32 = 1500;

const EVENT_USER: &str = r#"date={{ strftime(date, "%Y-%m-%d") }} time={{ timestamp }} devname="{{ dev_name }}" devid="{{ dev_id }}" logid="{{ log_id }}" type="event" subtype="user" level="{{ level }}" vd="{{ vd }}" eventtime={{ date }} tz="{{ timezone }}" logdesc="FSSO logon authentication status" srcip={{ src_ip }} user="{{ user }}" server="{{ server }}" action="FSSO-logon" msg="FSSO-logon event from FSSO_{{ server }}: user {{ user }} logged on {{ src_ip }}""#;

const EVENT_SYSTEM: &str = r#"date={{ strftime(date, "%Y-%m-%d") }} time={{ timestamp }} devname="{{ dev_name }}" devid="{{ dev_id }}" logid="{{ log_id }}" type="event" subtype="system" level="{{ level }}" vd="{{ vd }}" eventtime={{ date }} tz="{{ timezone }}" logdesc="FortiSandbox AV database updated" version="1.522479" msg="FortiSandbox AV database updated""#;

const UTM_DNS: &str = r#"date={{ strftime(date, "%Y-%m-%d") }} time={{ timestamp }} devname="{{ dev_name }}" devid="{{ dev_id }}" logid="{{ log_id }}" type="utm" subtype="dns" eventtype="dns-query" level="{{ level }}" vd="{{ vd }}" eventtime={{ date }} tz="{{ timezone }}" policyid={{ policy_id }} sessionid={{ session_id }} srcip={{ src_ip }} srcport={{ src_port }} srcintf="{{ interface1 }}" srcintfrole="{{ interface_role1 }}" dstip={{ dst_ip }} dstport=53 dstintf="{{ interface2 }}" dstintfrole="{{ interface_role2 }}" proto={{ protocol }} profile="{{ server }}" xid={{ xid }} qname="{{ query_name }}" qtype="{{ query_type }}" qtypeval=1 qclass="IN""#;

const TRAFFIC_FORWARD: &str = r#"date={{ strftime(date, "%Y-%m-%d") }} time={{ timestamp }} devname="{{ dev_name }}" devid="{{ dev_id }}" logid="{{ log_id }}" type="traffic" subtype="forward" level="{{ level }}" vd="{{ vd }}" eventtime={{ date }} srcip={{ src_ip }} srcport={{ src_port }} srcintf="{{ interface1 }}" srcintfrole="{{ interface_role1 }}" dstip={{ dst_ip }} dstport={{ dst_port }} dstintf="{{ interface2 }}" dstintfrole="{{ interface_role2 }}" sessionid={{ session_id }} proto={{ protocol }} action="{{ traffic_action }}" policyid={{ policy_id }} policytype="policy" service="SNMP" dstcountry="Reserved" srccountry="Reserved" trandisp="noop" duration={{ duration }} sentbyte={{ sent_bytes }} rcvdbyte={{ received_bytes }} sentpkt={{ sent_packets }} appcat="unscanned" crscore=30 craction=131072 crlevel="high""#;

const TEMPLATES: [(&str, &str); 4] = [
    ("event_user", EVENT_USER),
    ("event_system", EVENT_SYSTEM),
    ("utm_dns", UTM_DNS),
    ("traffic_forward", TRAFFIC_FORWARD),
];

pub(crate) const DEVICES: [&str; 50] = [
    "Lakewood", "Midvale", "Brookside", "Holloway", "Fairview", "Westport", "Elmswood",
    "Ridgefield", "Pinehurst", "Stonebridge", "Mapleton", "Riverside", "Graysville",
    "Windermere", "Briarcliff", "Oakridge", "Highland", "Copperfield", "Woodhaven",
    "Silverton", "Rosewood", "Cedarcrest", "Ashford", "Elmwood", "Woodbury", "Springfield",
    "Ravenswood", "Stonegate", "Brookhaven", "Southgate", "Seabrook", "Edgewood",
    "Greenfield", "Meadowbrook", "Bellevue", "Clarksville", "Oakwood", "Ridgemont",
    "Crystal_Lake", "Riverview", "Whispering_Pines", "Forest_Hill", "Sunnydale", "Mountview",
    "Woodlake", "Baywood", "Brentwood", "Lincolnwood", "Summitville", "Elm_Grove",
];

pub(crate) const DEVICE_IDS: [&str; 50] = [
    "Lakew", "Midva", "Broos", "Hollo", "Fairv", "Westp", "Elmsw", "Ridge", "Pineh", "Stonb",
    "Maple", "Rivers", "Grayv", "Windm", "Briac", "Oakri", "Highl", "Copfi", "Woodh", "Silve",
    "Rosew", "Cedcr", "Ashfo", "Elmwo", "Woodb", "Sprin", "Raven", "Stoga", "Brooh", "South",
    "Seabr", "Edgew", "Green", "Meado", "Belle", "Clark", "Oakwo", "Ridgm", "Cryla", "Rivew",
    "Whisp", "Foreh", "Sunny", "Mount", "Woodl", "Baywo", "Brewd", "Lincw", "Summi", "Elmgv",
];

pub(crate) const USERS: [&str; 50] = [
    "Liam_Walters", "Emma_Douglas", "Noah_Hamilton", "Olivia_Stevens", "Elijah_Baker",
    "Ava_Reynolds", "James_Thompson", "Sophia_Parker", "Lucas_Bennett", "Isabella_Brooks",
    "Mason_Rogers", "Mia_Campbell", "Ethan_Phillips", "Amelia_Bell", "Alexander_Carter",
    "Charlotte_Adams", "Henry_Patterson", "Harper_Wright", "Sebastian_Cooper", "Evelyn_Gray",
    "Jack_Hughes", "Lily_Ross", "Owen_Morris", "Ella_Hayes", "Daniel_Peterson", "Aria_Myers",
    "Samuel_Long", "Chloe_Collins", "Matthew_Hughes", "Grace_Cook", "Wyatt_Warren",
    "Scarlett_Reed", "Caleb_Bryant", "Penelope_Rogers", "Isaac_Murphy", "Nora_Jenkins",
    "Jacob_Cunningham", "Hazel_Clark", "Levi_Morgan", "Riley_Perry", "Nathaniel_Foster",
    "Zoey_Ford", "Joshua_Harrison", "Lillian_Sullivan", "David_McCarthy", "Avery_Hart",
    "Andrew_Walker", "Stella_Price", "Thomas_Ward", "Hannah_Hall",
];

pub(crate) const LEVELS: [&str; 4] = ["warning", "notice", "information", "error"];

pub(crate) const INTERFACES: [&str; 8] =
    ["int0", "int1", "int2", "int3", "int4", "int5", "int6", "int7"];

pub(crate) const ROLES: [&str; 6] = ["lan", "wan", "internal", "external", "inbound", "outbound"];

pub(crate) const PROTOCOLS: [u8; 2] = [6, 17];

pub(crate) const QUERIES: [&str; 49] = [
    "www.silverpinevalley.com", "www.brickstoneridge.net", "www.oakwoodgrove.org",
    "www.bluewaterhaven.co", "www.copperhollow.info", "www.windyriverplains.com",
    "www.crystalbayvillage.net", "www.ironwoodcove.org", "www.sunsetbluffresort.co",
    "www.whisperinghillspoint.info", "www.mapleridgeranch.com", "www.goldenpeakfarms.net",
    "www.riverviewmeadows.org", "www.stonecreekwoods.co", "www.briarwoodcrossing.info",
    "www.highlandgrovesprings.com", "www.greenfieldretreat.net", "www.silverlakehollow.org",
    "www.rosewoodvista.co", "www.ashforddunes.info", "www.willowbrookcourt.com",
    "www.oakridgefalls.net", "www.copperfieldgrove.org", "www.windermerebay.co",
    "www.meadowbrookhaven.info", "www.bellavistaacres.com", "www.ridgemontestates.net",
    "www.sunnydaleshores.org", "www.lakewoodreserves.co", "www.westportpines.info",
    "www.elmswoodmeadow.com", "www.ridgefieldplaza.net", "www.pinehurstcove.org",
    "www.stonebridgeflats.co", "www.mapletonlodge.info", "www.graysvillemanor.com",
    "www.windermerepoint.net", "www.briarcliffheights.org", "www.oakridgebay.co",
    "www.highlandcrossing.info", "www.copperfieldterrace.com", "www.woodhavenhills.net",
    "www.silvertonview.org", "www.rosewoodvalley.co", "www.cedarcrestgrove.info",
    "www.ashfordpeaks.com", "www.elmwoodlakes.net", "www.woodburyridge.org",
    "www.springfieldbluff.co",
];

pub(crate) const QUERY_TYPES: [&str; 2] = ["A", "AAAA"];

pub(crate) const SERVERS: [&str; 50] = [
    "Zeus_prod", "Hera_test", "Poseidon_dev", "Demeter_prod", "Athena_dev", "Apollo_test",
    "Artemis_prod", "Ares_dev", "Aphrodite_test", "Hephaestus_prod", "Hermes_dev",
    "Hestia_test", "Dionysus_prod", "Hades_dev", "Persephone_test", "Hecate_prod", "Gaia_dev",
    "Cronus_test", "Rhea_prod", "Eros_dev", "Helios_test", "Selene_prod", "Eos_dev",
    "Nike_test", "Nemesis_prod", "Iris_dev", "Hypnos_test", "Thanatos_prod", "Morpheus_dev",
    "Tyche_test", "Pan_prod", "Eris_dev", "Hebe_test", "Nyx_prod", "Khione_dev", "Themis_test",
    "Harmonia_prod", "Phoebe_dev", "Leto_test", "Tethys_prod", "Metis_dev", "Aether_test",
    "Hemera_prod", "Eurus_dev", "Notus_test", "Boreas_prod", "Zephyrus_dev", "Styx_test",
    "Phobos_prod", "Deimos_dev",
];

pub(crate) const TRAFFIC_ACTIONS: [&str; 2] = ["deny", "accept"];

/// Options accepted by the FortiGate format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirewallOptions {
    /// Seed for the generator's random source, entropy when unset
    pub seed: Option<u64>,

    /// UTC offset written to `tz`, formatted `+HHMM` / `-HHMM`
    pub timezone: String,

    /// Virtual domain written to `vd`
    pub vd: String,
}

impl Default for FirewallOptions {
    fn default() -> Self {
        Self {
            seed: None,
            timezone: "-0500".to_string(),
            vd: "root".to_string(),
        }
    }
}

impl ValidateOptions for FirewallOptions {
    fn validate(&self) -> Result<(), String> {
        if !is_utc_offset(&self.timezone) {
            return Err(format!(
                "timezone '{}' is not a UTC offset like -0500",
                self.timezone
            ));
        }
        if self.vd.is_empty() || self.vd.contains(|c: char| c.is_whitespace() || c == '"') {
            return Err(format!("vd '{}' must be a non-empty bare word", self.vd));
        }
        Ok(())
    }
}

fn is_utc_offset(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || !matches!(bytes[0], b'+' | b'-') {
        return false;
    }
    if !bytes[1..].iter().all(u8::is_ascii_digit) {
        return false;
    }
    let hours = (bytes[1] - b'0') * 10 + (bytes[2] - b'0');
    let minutes = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
    hours <= 14 && minutes <= 59
}

/// Field values for the next FortiGate line.
#[derive(Debug, Clone, Serialize)]
pub struct FirewallRecord {
    pub timestamp: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    pub dev_name: &'static str,
    pub dev_id: &'static str,
    pub log_id: u32,
    pub level: &'static str,
    pub vd: String,
    pub timezone: String,
    pub user: &'static str,
    pub server: &'static str,
    pub src_ip: Ipv4Addr,
    pub src_port: u16,
    pub dst_ip: Ipv4Addr,
    pub dst_port: u16,
    pub policy_id: u32,
    pub session_id: u32,
    pub interface1: &'static str,
    pub interface2: &'static str,
    pub interface_role1: &'static str,
    pub interface_role2: &'static str,
    pub protocol: u8,
    pub query_name: &'static str,
    pub query_type: &'static str,
    pub xid: u32,
    pub traffic_action: &'static str,
    pub sent_packets: u32,
    pub sent_bytes: u32,
    pub received_bytes: u32,
    pub duration: u32,
}

impl FirewallRecord {
    /// Draw every field independently.
    fn random<R: Rng + ?Sized>(rng: &mut R, options: &FirewallOptions) -> Self {
        let now = Utc::now().trunc_subsecs(0);
        let sent_packets = rng.gen_range(0..65_536);

        Self {
            timestamp: random::recent_time(rng, now),
            date: now,
            dev_name: random::pick(rng, &DEVICES),
            dev_id: random::pick(rng, &DEVICE_IDS),
            log_id: rng.gen_range(0..10),
            level: random::pick(rng, &LEVELS),
            vd: options.vd.clone(),
            timezone: options.timezone.clone(),
            user: random::pick(rng, &USERS),
            server: random::pick(rng, &SERVERS),
            src_ip: random::ipv4(rng),
            src_port: random::port(rng),
            dst_ip: random::ipv4(rng),
            dst_port: random::port(rng),
            policy_id: rng.gen_range(0..256),
            session_id: rng.gen_range(0..65_536),
            interface1: random::pick(rng, &INTERFACES),
            interface2: random::pick(rng, &INTERFACES),
            interface_role1: random::pick(rng, &ROLES),
            interface_role2: random::pick(rng, &ROLES),
            protocol: random::pick(rng, &PROTOCOLS),
            query_name: random::pick(rng, &QUERIES),
            query_type: random::pick(rng, &QUERY_TYPES),
            xid: rng.gen_range(0..256),
            traffic_action: random::pick(rng, &TRAFFIC_ACTIONS),
            sent_packets,
            sent_bytes: sent_packets * FRAME_SIZE,
            received_bytes: rng.gen_range(0..65_536 * FRAME_SIZE),
            duration: rng.gen_range(0..1024),
        }
    }
}

/// FortiGate log line generator.
pub struct FortinetFirewall {
    options: FirewallOptions,
    record: FirewallRecord,
    templates: TemplateEngine,
    rng: StdRng,
}

impl FortinetFirewall {
    /// Build a generator from a JSON options tree.
    pub fn new(options: &serde_json::Value) -> Result<Self, GeneratorError> {
        let options: FirewallOptions = parse_options(NAME, options)?;
        let templates = TemplateEngine::compile_all(&FunctionSet::standard(), &TEMPLATES)?;

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let record = FirewallRecord::random(&mut rng, &options);

        debug!(
            format = NAME,
            templates = templates.len(),
            seeded = options.seed.is_some(),
            "Generator constructed"
        );

        Ok(Self {
            options,
            record,
            templates,
            rng,
        })
    }

    /// Record the next line will be rendered from.
    pub fn record(&self) -> &FirewallRecord {
        &self.record
    }

    fn render(&self, id: TemplateId) -> Result<Vec<u8>, GeneratorError> {
        self.templates.render(id, &self.record)
    }

    fn randomize(&mut self) {
        self.record = FirewallRecord::random(&mut self.rng, &self.options);
    }
}

impl Generator for FortinetFirewall {
    fn format(&self) -> &'static str {
        NAME
    }

    fn next(&mut self) -> Result<Vec<u8>, GeneratorError> {
        let id = self
            .templates
            .random_id(&mut self.rng)
            .ok_or_else(|| GeneratorError::config(NAME, "no templates compiled"))?;
        let line = self.render(id)?;

        // Redraw only after rendering so the returned line matches `record()` beforehand
        self.randomize();
        Ok(line)
    }
}

fn construct(options: &serde_json::Value) -> Result<Box<dyn Generator>, GeneratorError> {
    Ok(Box::new(FortinetFirewall::new(options)?))
}

/// Add this format to `registry`.
pub fn register(registry: &mut GeneratorRegistry) {
    registry.register(NAME, construct);
}
