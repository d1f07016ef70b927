use mal_enrich_models::{
    MovieExternals, OutputMovie, OutputShow, OverrideEntry, ShowExternals,
};

/// Set `field` to `patch` when the patch is present and differs. Returns
/// whether the field actually changed, so a patch that already matches
/// the record reports no modification.
fn patch_field<T: Clone + PartialEq>(field: &mut T, patch: &Option<T>) -> bool {
    match patch {
        Some(value) if field != value => {
            *field = value.clone();
            true
        }
        _ => false,
    }
}

fn patch_opt_field<T: Clone + PartialEq>(field: &mut Option<T>, patch: &Option<T>) -> bool {
    match patch {
        Some(value) if field.as_ref() != Some(value) => {
            *field = Some(value.clone());
            true
        }
        _ => false,
    }
}

/// Apply a manual correction to a show record. Returns true when the
/// canonical id, slug, or cross-reference set changed; that drives the
/// Modified classification. Title and type corrections are applied but
/// do not reclassify the record.
pub fn apply_show_override(record: &mut OutputShow, entry: &OverrideEntry) -> bool {
    let mut changed = false;

    if let Some(patch) = &entry.trakt {
        patch_field(&mut record.trakt.title, &patch.title);
        changed |= patch_field(&mut record.trakt.id, &patch.id);
        changed |= patch_field(&mut record.trakt.slug, &patch.slug);
        patch_field(&mut record.trakt.kind, &patch.kind);
    }

    if let Some(patch) = &entry.externals {
        let externals = record.externals.get_or_insert_with(ShowExternals::default);
        changed |= patch_opt_field(&mut externals.tvdb, &patch.tvdb);
        changed |= patch_opt_field(&mut externals.tmdb, &patch.tmdb);
        changed |= patch_opt_field(&mut externals.imdb, &patch.imdb);
        changed |= patch_opt_field(&mut externals.tvrage, &patch.tvrage);
    }

    changed
}

/// Apply a manual correction to a movie record. The shared patch shape
/// carries show-only fields (tvdb, tvrage); those are ignored here.
pub fn apply_movie_override(record: &mut OutputMovie, entry: &OverrideEntry) -> bool {
    let mut changed = false;

    if let Some(patch) = &entry.trakt {
        patch_field(&mut record.trakt.title, &patch.title);
        changed |= patch_field(&mut record.trakt.id, &patch.id);
        changed |= patch_field(&mut record.trakt.slug, &patch.slug);
        patch_field(&mut record.trakt.kind, &patch.kind);
    }

    if let Some(patch) = &entry.externals {
        let externals = record.externals.get_or_insert_with(MovieExternals::default);
        changed |= patch_opt_field(&mut externals.tmdb, &patch.tmdb);
        changed |= patch_opt_field(&mut externals.imdb, &patch.imdb);
        changed |= patch_opt_field(&mut externals.letterboxd, &patch.letterboxd);
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_enrich_models::{
        CanonicalPatch, ExternalsPatch, MovieEntry, ShowEntry, SourceEntry,
    };

    fn show_record() -> OutputShow {
        OutputShow {
            myanimelist: SourceEntry {
                title: "Src".into(),
                id: 1,
            },
            trakt: ShowEntry {
                title: "Wrong Title".into(),
                id: 10,
                slug: "wrong-title".into(),
                kind: "shows".into(),
                season: None,
                is_split_cour: false,
            },
            release_year: Some(2019),
            externals: None,
        }
    }

    fn override_entry(trakt: Option<CanonicalPatch>, externals: Option<ExternalsPatch>) -> OverrideEntry {
        OverrideEntry {
            mal_id: 1,
            description: "fix listing".into(),
            ignore: false,
            trakt,
            externals,
        }
    }

    #[test]
    fn canonical_patch_changes_only_present_fields() {
        let mut record = show_record();
        let entry = override_entry(
            Some(CanonicalPatch {
                slug: Some("right-title".into()),
                ..CanonicalPatch::default()
            }),
            None,
        );

        assert!(apply_show_override(&mut record, &entry));
        assert_eq!(record.trakt.slug, "right-title");
        assert_eq!(record.trakt.title, "Wrong Title");
        assert_eq!(record.trakt.id, 10);
    }

    #[test]
    fn title_only_patch_applies_without_reclassifying() {
        let mut record = show_record();
        let entry = override_entry(
            Some(CanonicalPatch {
                title: Some("Right Title".into()),
                ..CanonicalPatch::default()
            }),
            None,
        );

        assert!(!apply_show_override(&mut record, &entry));
        assert_eq!(record.trakt.title, "Right Title");
    }

    #[test]
    fn matching_patch_reports_no_change() {
        let mut record = show_record();
        let entry = override_entry(
            Some(CanonicalPatch {
                id: Some(10),
                slug: Some("wrong-title".into()),
                ..CanonicalPatch::default()
            }),
            None,
        );

        assert!(!apply_show_override(&mut record, &entry));
    }

    #[test]
    fn externals_patch_creates_missing_block() {
        let mut record = show_record();
        let entry = override_entry(
            None,
            Some(ExternalsPatch {
                tvdb: Some(999),
                ..ExternalsPatch::default()
            }),
        );

        assert!(apply_show_override(&mut record, &entry));
        assert_eq!(record.externals.as_ref().unwrap().tvdb, Some(999));
    }

    #[test]
    fn override_application_is_idempotent() {
        let mut record = show_record();
        let entry = override_entry(
            Some(CanonicalPatch {
                title: Some("Right Title".into()),
                ..CanonicalPatch::default()
            }),
            Some(ExternalsPatch {
                imdb: Some("tt0000001".into()),
                ..ExternalsPatch::default()
            }),
        );

        assert!(apply_show_override(&mut record, &entry));
        let after_first = record.clone();
        assert!(!apply_show_override(&mut record, &entry));
        assert_eq!(record, after_first);
    }

    #[test]
    fn movie_override_ignores_show_only_fields() {
        let mut record = OutputMovie {
            myanimelist: SourceEntry {
                title: "Src".into(),
                id: 2,
            },
            trakt: MovieEntry {
                title: "Film".into(),
                id: 20,
                slug: "film".into(),
                kind: "movies".into(),
            },
            release_year: None,
            externals: None,
        };
        let entry = override_entry(
            None,
            Some(ExternalsPatch {
                tvdb: Some(123),
                tvrage: Some(456),
                tmdb: Some(789),
                ..ExternalsPatch::default()
            }),
        );

        assert!(apply_movie_override(&mut record, &entry));
        let externals = record.externals.unwrap();
        assert_eq!(externals.tmdb, Some(789));
        assert!(externals.imdb.is_none());
    }
}
