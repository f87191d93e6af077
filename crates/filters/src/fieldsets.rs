//! Named projection shapes for Radarr movie records.

use std::sync::LazyLock;

use crate::path::KeyPath;
use crate::project::FieldSet;

const MINIMAL: &[&str] = &["id", "title", "year", "tmdbId"];

const DETAILS: &[&str] = &[
    "id",
    "title",
    "originalTitle",
    "year",
    "status",
    "overview",
    "inCinemas",
    "studio",
    "runtime",
    "genres",
    "imdbId",
    "tmdbId",
    "certification",
    "hasFile",
    "path",
    "monitored",
    "qualityProfileId",
    "ratings.*.value",
    "ratings.*.votes",
    "images.coverType",
    "images.url",
    "images.remoteUrl",
    "movieFile.size",
    "movieFile.quality.quality.name",
    "movieFile.languages.name",
    "movieFile.mediaInfo.audioChannels",
    "movieFile.mediaInfo.audioCodec",
    "movieFile.mediaInfo.videoDynamicRange",
    "movieFile.mediaInfo.subtitles",
    "popularity",
];

const FULL_EXTRA: &[&str] = &[
    "sortTitle",
    "physicalRelease",
    "digitalRelease",
    "tags",
    "titleSlug",
    "website",
    "youTubeTrailerId",
    "originalLanguage.name",
    "alternateTitles.title",
    "added",
    "minimumAvailability",
    "ratings.*.type",
    "movieFile.relativePath",
    "movieFile.dateAdded",
    "movieFile.edition",
    "movieFile.mediaInfo.resolution",
    "movieFile.mediaInfo.videoCodec",
    "movieFile.mediaInfo.runTime",
];

/// Paths under which Radarr emits origin-relative artwork locators.
const LOCATORS: &[&str] = &["images.*.url"];

static MOVIE_MINIMAL: LazyLock<FieldSet> = LazyLock::new(|| FieldSet::new(MINIMAL.iter().copied()));
static MOVIE_DETAILS: LazyLock<FieldSet> = LazyLock::new(|| FieldSet::new(DETAILS.iter().copied()));
static MOVIE_DETAILS_FULL: LazyLock<FieldSet> =
    LazyLock::new(|| MOVIE_DETAILS.extended(FULL_EXTRA.iter().copied()));
static LOCATOR_PATHS: LazyLock<Vec<KeyPath>> =
    LazyLock::new(|| LOCATORS.iter().copied().map(KeyPath::parse).collect());

/// `id`, `title`, `year`, `tmdbId`.
pub fn movie_minimal() -> FieldSet {
    MOVIE_MINIMAL.clone()
}

/// What an agent needs to pick a movie: descriptive fields, ratings,
/// artwork and a summary of the downloaded file.
pub fn movie_details() -> FieldSet {
    MOVIE_DETAILS.clone()
}

/// [`movie_details`] plus release dates, alternate titles and file detail.
pub fn movie_details_full() -> FieldSet {
    MOVIE_DETAILS_FULL.clone()
}

pub fn locator_paths() -> &'static [KeyPath] {
    &LOCATOR_PATHS
}
