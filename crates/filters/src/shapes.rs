//! Declared shapes of the records handed back to callers.
//!
//! Every field is optional: Radarr omits whatever it does not know, and
//! projection drops the rest. Sub-shapes are open unless noted.

use std::sync::{Arc, LazyLock};

use crate::schema::{Extensibility, FieldType, Schema};

use Extensibility::{Closed, IgnoreExtra, Open};
use FieldType::{Any, Bool, Integer, Number, String as Text};

fn fields(name: &str, mode: Extensibility, declared: &[(&str, FieldType)]) -> Arc<Schema> {
    let schema = declared
        .iter()
        .fold(Schema::new(name, mode), |schema, (field, ty)| schema.optional(*field, ty.clone()));
    Arc::new(schema)
}

static RATING_MIN: LazyLock<Arc<Schema>> =
    LazyLock::new(|| fields("RatingMin", Open, &[("value", Number), ("votes", Integer)]));

static RATING_FULL: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "RatingFull",
        Open,
        &[("votes", Integer), ("value", Number), ("type", Text)],
    )
});

static IMAGE: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "Image",
        Open,
        &[("coverType", Text), ("url", Text), ("remoteUrl", Text)],
    )
});

static LANGUAGE: LazyLock<Arc<Schema>> =
    LazyLock::new(|| fields("Language", Open, &[("id", Integer), ("name", Text)]));

static ALTERNATE_TITLE: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "AlternateTitle",
        IgnoreExtra,
        &[
            ("sourceType", Text),
            ("movieMetadataId", Integer),
            ("title", Text),
            ("id", Integer),
        ],
    )
});

static QUALITY_INFO: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "QualityInfo",
        Open,
        &[
            ("id", Integer),
            ("name", Text),
            ("source", Text),
            ("resolution", Integer),
            ("modifier", Text),
        ],
    )
});

static QUALITY_REVISION: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "QualityRevision",
        Open,
        &[("version", Integer), ("real", Integer), ("isRepack", Bool)],
    )
});

static MOVIE_FILE_QUALITY: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "MovieFileQuality",
        Open,
        &[
            ("quality", FieldType::shape(&QUALITY_INFO)),
            ("revision", FieldType::shape(&QUALITY_REVISION)),
        ],
    )
});

static MEDIA_INFO_MIN: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "MediaInfoMin",
        Open,
        &[
            ("audioChannels", Number),
            ("audioCodec", Text),
            ("videoDynamicRange", Text),
            ("subtitles", Text),
        ],
    )
});

static MEDIA_INFO_FULL: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "MediaInfoFull",
        Open,
        &[
            ("audioChannels", Number),
            ("audioCodec", Text),
            ("audioLanguages", Text),
            ("audioStreamCount", Integer),
            ("videoBitDepth", Integer),
            ("videoBitrate", Integer),
            ("videoCodec", Text),
            ("videoFps", Number),
            ("videoDynamicRange", Text),
            ("videoDynamicRangeType", Text),
            ("resolution", Text),
            ("runTime", Text),
            ("scanType", Text),
            ("subtitles", Text),
            ("audioBitrate", Integer),
        ],
    )
});

static MOVIE_FILE_MIN: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "MovieFileMin",
        Open,
        &[
            ("size", Integer),
            ("quality", FieldType::shape(&MOVIE_FILE_QUALITY)),
            ("languages", FieldType::list(FieldType::shape(&LANGUAGE))),
            ("mediaInfo", FieldType::shape(&MEDIA_INFO_MIN)),
        ],
    )
});

static MOVIE_FILE_FULL: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "MovieFileFull",
        Open,
        &[
            ("id", Integer),
            ("movieId", Integer),
            ("relativePath", Text),
            ("path", Text),
            ("size", Integer),
            ("dateAdded", Text),
            ("edition", Text),
            ("quality", FieldType::shape(&MOVIE_FILE_QUALITY)),
            ("mediaInfo", FieldType::shape(&MEDIA_INFO_FULL)),
            ("languages", FieldType::list(FieldType::shape(&LANGUAGE))),
            ("customFormatScore", Integer),
            ("indexerFlags", Integer),
            ("qualityCutoffNotMet", Bool),
        ],
    )
});

static RADARR_STATUS: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let schema = Schema::new("RadarrStatus", Open)
        .required("tracked", Bool)
        .required("monitored", Bool)
        .required("downloaded", Bool);
    Arc::new(schema)
});

static MOVIE_MINIMAL: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    fields(
        "MovieMinimal",
        Open,
        &[("id", Integer), ("title", Text), ("year", Integer), ("tmdbId", Integer)],
    )
});

/// Descriptive fields shared by both detail shapes.
fn detail_fields() -> Vec<(&'static str, FieldType)> {
    vec![
        ("id", Integer),
        ("title", Text),
        ("originalTitle", Text),
        ("year", Integer),
        ("status", Text),
        ("overview", Text),
        ("inCinemas", Text),
        ("studio", Text),
        ("runtime", Integer),
        ("genres", FieldType::list(Text)),
        ("imdbId", Text),
        ("tmdbId", Integer),
        ("certification", Text),
        ("hasFile", Bool),
        ("path", Text),
        ("monitored", Bool),
        ("qualityProfileId", Integer),
        ("images", FieldType::list(FieldType::shape(&IMAGE))),
        ("popularity", Number),
        ("radarr_status", FieldType::shape(&RADARR_STATUS)),
    ]
}

static MOVIE_DETAILS: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let mut declared = detail_fields();
    declared.extend([
        ("ratings", FieldType::map(FieldType::shape(&RATING_MIN))),
        ("movieFile", FieldType::shape(&MOVIE_FILE_MIN)),
    ]);
    fields("MovieDetails", IgnoreExtra, &declared)
});

static MOVIE_DETAILS_FULL: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let mut declared = detail_fields();
    declared.extend([
        ("sortTitle", Text),
        ("physicalRelease", Text),
        ("digitalRelease", Text),
        ("tags", FieldType::list(Any)),
        ("titleSlug", Text),
        ("website", Text),
        ("youTubeTrailerId", Text),
        ("originalLanguage", FieldType::shape(&LANGUAGE)),
        ("alternateTitles", FieldType::list(FieldType::shape(&ALTERNATE_TITLE))),
        ("added", Text),
        ("minimumAvailability", Text),
        ("ratings", FieldType::map(FieldType::shape(&RATING_FULL))),
        ("movieFile", FieldType::shape(&MOVIE_FILE_FULL)),
    ]);
    fields("MovieDetailsFull", Open, &declared)
});

static QUALITY_PROFILE: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    let schema = Schema::new("QualityProfile", Closed)
        .required("id", Integer)
        .required("name", Text)
        .required("allowedQualities", FieldType::list(Text));
    Arc::new(schema)
});

pub fn movie_minimal() -> Arc<Schema> {
    Arc::clone(&MOVIE_MINIMAL)
}

/// Undeclared keys are dropped.
pub fn movie_details() -> Arc<Schema> {
    Arc::clone(&MOVIE_DETAILS)
}

pub fn movie_details_full() -> Arc<Schema> {
    Arc::clone(&MOVIE_DETAILS_FULL)
}

pub fn quality_profile() -> Arc<Schema> {
    Arc::clone(&QUALITY_PROFILE)
}

pub fn radarr_status() -> Arc<Schema> {
    Arc::clone(&RADARR_STATUS)
}
