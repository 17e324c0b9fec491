/// A county and its parcel layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub endpoint: &'static str,
}

pub const REGIONS: &[Region] = &[
    Region {
        name: "Salt Lake",
        endpoint: "https://services1.arcgis.com/99lidPhWCzftIe9K/ArcGIS/rest/services/Parcels_SaltLake_LIR/FeatureServer/0",
    },
    Region {
        name: "Utah",
        endpoint: "https://services1.arcgis.com/99lidPhWCzftIe9K/ArcGIS/rest/services/Parcels_Utah_LIR/FeatureServer/0",
    },
    Region {
        name: "Davis",
        endpoint: "https://services1.arcgis.com/99lidPhWCzftIe9K/ArcGIS/rest/services/Parcels_Davis_LIR/FeatureServer/0",
    },
    Region {
        name: "Weber",
        endpoint: "https://services1.arcgis.com/99lidPhWCzftIe9K/ArcGIS/rest/services/Parcels_Weber_LIR/FeatureServer/0",
    },
];

/// Resolves a comma-separated selection against `known`, keeping table order.
/// `None` selects everything; unknown names are ignored.
pub fn select<'a>(known: &'a [Region], filter: Option<&str>) -> Vec<&'a Region> {
    let Some(filter) = filter else {
        return known.iter().collect();
    };

    let wanted: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    known
        .iter()
        .filter(|r| wanted.contains(&r.name))
        .collect()
}
