//! Tables compiled into the crate.

mod organizations;

use crate::{Coordinate, GazetteerData, PlaceRecord, Region, RegionId, RegionTable};
pub(crate) use organizations::organizations;

/// (canonical place, postal code, aliases, lat, lon)
type PlaceRow = (&'static str, &'static str, &'static [&'static str], f64, f64);

const KERALA: &[PlaceRow] = &[
    ("Thiruvananthapuram", "695001", &["trivandrum", "tvm", "thiruvanathapuram"], 8.5241, 76.9366),
    ("Kollam", "691001", &["quilon"], 8.8932, 76.6141),
    ("Pathanamthitta", "689645", &["pathanamthita"], 9.2648, 76.7870),
    ("Alappuzha", "688001", &["alleppey", "alapuzha"], 9.4981, 76.3388),
    ("Kottayam", "686001", &["kotayam"], 9.5916, 76.5222),
    ("Idukki", "685603", &["painavu"], 9.8497, 76.9720),
    ("Ekm", "682001", &["ernakulam", "eranakulam", "ernakulum"], 9.9816, 76.2999),
    ("Thrissur", "680001", &["trichur", "thrishur"], 10.5276, 76.2144),
    ("Palakkad", "678001", &["palghat", "palakad"], 10.7867, 76.6548),
    ("Malappuram", "676505", &["malapuram"], 11.0510, 76.0711),
    ("Kozhikode", "673001", &["calicut", "kozhikkode"], 11.2588, 75.7804),
    ("Wayanad", "673122", &["kalpetta", "wayand"], 11.6854, 76.1320),
    ("Kannur", "670001", &["cannanore"], 11.8745, 75.3704),
    ("Kasaragod", "671121", &["kasargod", "kasaragode"], 12.4996, 74.9869),
];

const KARNATAKA: &[PlaceRow] = &[
    ("Bengaluru", "560001", &["bangalore", "bengalooru", "blr"], 12.9716, 77.5946),
    ("Mysuru", "570001", &["mysore"], 12.2958, 76.6394),
    ("Mangaluru", "575001", &["mangalore", "kudla"], 12.9141, 74.8560),
    ("Hubballi", "580020", &["hubli", "hubbali"], 15.3647, 75.1240),
    ("Dharwad", "580001", &["dharwar"], 15.4589, 75.0078),
    ("Belagavi", "590001", &["belgaum"], 15.8497, 74.4977),
    ("Kalaburagi", "585101", &["gulbarga"], 17.3297, 76.8343),
    ("Udupi", "576101", &["udipi"], 13.3409, 74.7421),
    ("Shivamogga", "577201", &["shimoga"], 13.9299, 75.5681),
    ("Tumakuru", "572101", &["tumkur"], 13.3379, 77.1173),
    ("Davanagere", "577001", &["davangere"], 14.4644, 75.9218),
    ("Ballari", "583101", &["bellary"], 15.1394, 76.9214),
    ("Hassan", "573201", &[], 13.0033, 76.1004),
    ("Mandya", "571401", &[], 12.5218, 76.8951),
    ("Chikkamagaluru", "577101", &["chikmagalur"], 13.3161, 75.7720),
    ("Madikeri", "571201", &["kodagu", "coorg"], 12.4244, 75.7382),
    ("Vijayapura", "586101", &["bijapur"], 16.8302, 75.7100),
];

fn region_table(id: &str, name: &str, centroid: Coordinate, rows: &[PlaceRow]) -> RegionTable {
    RegionTable {
        region: Region {
            id: RegionId::new(id),
            name: name.to_string(),
            country: "India".to_string(),
        },
        centroid,
        places: rows
            .iter()
            .map(|(place, postal_code, aliases, lat, lon)| PlaceRecord {
                place: (*place).to_string(),
                postal_code: (*postal_code).to_string(),
                aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
                centroid: Coordinate::new(*lat, *lon),
            })
            .collect(),
    }
}

pub(crate) fn gazetteer() -> GazetteerData {
    GazetteerData {
        regions: vec![
            region_table("kerala", "Kerala", Coordinate::new(10.8505, 76.2711), KERALA),
            region_table(
                "karnataka",
                "Karnataka",
                Coordinate::new(15.3173, 75.7139),
                KARNATAKA,
            ),
        ],
    }
}
