//! Site profiles. Known marketplaces are picked by hostname; everything else
//! goes through the generic profile.

pub mod cardekho;
pub mod cars24;
pub mod carwale;
pub mod generic;
pub mod olx;
pub mod spinny;

use url::Url;

use crate::extractor::template::SiteProfile;

pub static KNOWN: [&SiteProfile; 5] = [
    &cardekho::PROFILE,
    &cars24::PROFILE,
    &carwale::PROFILE,
    &spinny::PROFILE,
    &olx::PROFILE,
];

pub fn generic() -> &'static SiteProfile {
    &generic::PROFILE
}

/// The profile for `url`'s host, or the generic one.
pub fn profile_for(url: &Url) -> &'static SiteProfile {
    url.host_str()
        .and_then(|host| KNOWN.iter().copied().find(|profile| profile.matches_host(host)))
        .unwrap_or_else(generic)
}
