use std::fmt;

use super::category::RecordCategory;

/// DNS resource record type, decoupled from any particular wire-protocol
/// crate's own enum so the domain layer stays free of `hickory-proto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    PTR,
    SRV,
    SOA,
    NS,
    NAPTR,
    DS,
    DNSKEY,
    SVCB,
    HTTPS,
    ANAME,
    DNAME,
    CAA,
    TLSA,
    SSHFP,
    RRSIG,
    NSEC,
    NSEC3,
    NSEC3PARAM,
    CDS,
    CDNSKEY,
    OPT,
    NULL,
    HINFO,
    WKS,
    IPSECKEY,
    OPENPGPKEY,
    ZONEMD,
    /// Any numeric type this crate doesn't have a named variant for.
    Unknown(u16),
}

impl RecordType {
    pub fn category(&self) -> RecordCategory {
        match self {
            RecordType::A | RecordType::AAAA | RecordType::CNAME | RecordType::MX
            | RecordType::TXT | RecordType::PTR => RecordCategory::Basic,
            RecordType::SRV | RecordType::SOA | RecordType::NS | RecordType::NAPTR
            | RecordType::SVCB | RecordType::HTTPS | RecordType::ANAME | RecordType::DNAME => {
                RecordCategory::Advanced
            }
            RecordType::DS | RecordType::DNSKEY | RecordType::RRSIG | RecordType::NSEC
            | RecordType::NSEC3 | RecordType::NSEC3PARAM | RecordType::CDS
            | RecordType::CDNSKEY => RecordCategory::Dnssec,
            RecordType::CAA | RecordType::TLSA | RecordType::SSHFP | RecordType::IPSECKEY
            | RecordType::OPENPGPKEY => RecordCategory::Security,
            RecordType::NULL | RecordType::HINFO | RecordType::WKS => RecordCategory::Legacy,
            RecordType::OPT => RecordCategory::Protocol,
            RecordType::ZONEMD => RecordCategory::Integrity,
            RecordType::Unknown(_) => RecordCategory::Legacy,
        }
    }

    pub fn by_category(category: RecordCategory) -> Vec<RecordType> {
        Self::all()
            .iter()
            .copied()
            .filter(|rt| rt.category() == category)
            .collect()
    }

    pub fn is_dnssec(&self) -> bool {
        self.category() == RecordCategory::Dnssec
    }

    pub fn is_security_related(&self) -> bool {
        self.category() == RecordCategory::Security
    }

    /// "Modern" records: the ones introduced for SVCB-era encrypted
    /// transport bootstrap and DDR, per spec's DDR/HTTPS usage.
    pub fn is_modern(&self) -> bool {
        matches!(self, RecordType::SVCB | RecordType::HTTPS)
    }

    pub fn all() -> &'static [RecordType] {
        &[
            RecordType::A,
            RecordType::AAAA,
            RecordType::CNAME,
            RecordType::MX,
            RecordType::TXT,
            RecordType::PTR,
            RecordType::SRV,
            RecordType::SOA,
            RecordType::NS,
            RecordType::NAPTR,
            RecordType::DS,
            RecordType::DNSKEY,
            RecordType::SVCB,
            RecordType::HTTPS,
            RecordType::ANAME,
            RecordType::DNAME,
            RecordType::CAA,
            RecordType::TLSA,
            RecordType::SSHFP,
            RecordType::RRSIG,
            RecordType::NSEC,
            RecordType::NSEC3,
            RecordType::NSEC3PARAM,
            RecordType::CDS,
            RecordType::CDNSKEY,
            RecordType::OPT,
            RecordType::NULL,
            RecordType::HINFO,
            RecordType::WKS,
            RecordType::IPSECKEY,
            RecordType::OPENPGPKEY,
            RecordType::ZONEMD,
        ]
    }

    pub fn from_u16(value: u16) -> RecordType {
        match value {
            1 => RecordType::A,
            2 => RecordType::NS,
            5 => RecordType::CNAME,
            6 => RecordType::SOA,
            11 => RecordType::WKS,
            12 => RecordType::PTR,
            13 => RecordType::HINFO,
            15 => RecordType::MX,
            16 => RecordType::TXT,
            28 => RecordType::AAAA,
            33 => RecordType::SRV,
            35 => RecordType::NAPTR,
            39 => RecordType::DNAME,
            41 => RecordType::OPT,
            43 => RecordType::DS,
            44 => RecordType::SSHFP,
            45 => RecordType::IPSECKEY,
            46 => RecordType::RRSIG,
            47 => RecordType::NSEC,
            48 => RecordType::DNSKEY,
            50 => RecordType::NSEC3,
            51 => RecordType::NSEC3PARAM,
            59 => RecordType::CDS,
            60 => RecordType::CDNSKEY,
            61 => RecordType::OPENPGPKEY,
            63 => RecordType::ZONEMD,
            64 => RecordType::SVCB,
            65 => RecordType::HTTPS,
            257 => RecordType::CAA,
            52 => RecordType::TLSA,
            other => RecordType::Unknown(other),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::WKS => 11,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::DNAME => 39,
            RecordType::OPT => 41,
            RecordType::DS => 43,
            RecordType::SSHFP => 44,
            RecordType::IPSECKEY => 45,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::NSEC3 => 50,
            RecordType::NSEC3PARAM => 51,
            RecordType::TLSA => 52,
            RecordType::CDS => 59,
            RecordType::CDNSKEY => 60,
            RecordType::OPENPGPKEY => 61,
            RecordType::ZONEMD => 63,
            RecordType::SVCB => 64,
            RecordType::HTTPS => 65,
            RecordType::CAA => 257,
            RecordType::ANAME => 65305,
            RecordType::NULL => 10,
            RecordType::Unknown(v) => *v,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Unknown(v) => write!(f, "TYPE{v}"),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_u16() {
        for rt in RecordType::all() {
            if matches!(rt, RecordType::ANAME) {
                continue; // synthetic, not a real wire type number
            }
            assert_eq!(RecordType::from_u16(rt.as_u16()), *rt);
        }
    }

    #[test]
    fn categorizes_dnssec_records() {
        assert!(RecordType::DS.is_dnssec());
        assert!(!RecordType::A.is_dnssec());
    }

    #[test]
    fn by_category_filters() {
        let basic = RecordType::by_category(RecordCategory::Basic);
        assert!(basic.contains(&RecordType::A));
        assert!(!basic.contains(&RecordType::DS));
    }
}
