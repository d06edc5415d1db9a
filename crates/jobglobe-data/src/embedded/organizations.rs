use crate::{Coordinate, OpenPosition, Organization, Organizations, RegionId};

fn position(title: &str, kind: &str, experience: &str, salary: &str) -> OpenPosition {
    OpenPosition {
        title: title.to_string(),
        kind: kind.to_string(),
        experience: experience.to_string(),
        salary: salary.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn org(
    name: &str,
    address: &str,
    place: &str,
    region: &str,
    lat: f64,
    lon: f64,
    logo: &str,
    positions: Vec<OpenPosition>,
) -> Organization {
    Organization {
        name: name.to_string(),
        address: address.to_string(),
        place: place.to_string(),
        region: RegionId::new(region),
        coordinate: Coordinate::new(lat, lon),
        logo: logo.to_string(),
        positions,
    }
}

pub(crate) fn organizations() -> Organizations {
    Organizations::new(vec![
        org(
            "Infopark Software Labs",
            "Infopark Phase 1, Kakkanad, Kochi, Kerala 682042",
            "Ekm",
            "kerala",
            10.0107,
            76.3636,
            "logos/infopark-labs.svg",
            vec![
                position("Frontend Developer", "Full-time", "2-4 years", "₹8-12 LPA"),
                position("QA Engineer", "Full-time", "1-3 years", "₹5-7 LPA"),
            ],
        ),
        org(
            "Backwater Analytics",
            "Marine Drive, Ernakulam, Kochi, Kerala 682031",
            "Ekm",
            "kerala",
            9.9777,
            76.2773,
            "logos/backwater.svg",
            vec![
                position("Data Analyst", "Full-time", "0-2 years", "₹4-6 LPA"),
                position("ML Engineer", "Full-time", "3-5 years", "₹14-20 LPA"),
                position("Product Intern", "Internship", "Fresher", "₹20k/month"),
            ],
        ),
        org(
            "Smart City Systems",
            "SmartCity Kochi, Kakkanad, Kochi, Kerala 682037",
            "Ekm",
            "kerala",
            10.0159,
            76.3541,
            "logos/smartcity.svg",
            vec![position("DevOps Engineer", "Contract", "4-6 years", "₹15-18 LPA")],
        ),
        org(
            "Technopark Cloudworks",
            "Technopark Phase 3, Kazhakkoottam, Thiruvananthapuram, Kerala 695581",
            "Thiruvananthapuram",
            "kerala",
            8.5581,
            76.8816,
            "logos/cloudworks.svg",
            vec![
                position("Backend Developer", "Full-time", "2-5 years", "₹9-14 LPA"),
                position("Site Reliability Engineer", "Full-time", "5+ years", "₹20-28 LPA"),
            ],
        ),
        org(
            "Malabar Digital",
            "Cyberpark, Nellikode, Kozhikode, Kerala 673016",
            "Kozhikode",
            "kerala",
            11.2530,
            75.8340,
            "logos/malabar.svg",
            vec![position("UI/UX Designer", "Full-time", "1-3 years", "₹5-8 LPA")],
        ),
        org(
            "Cauvery Compute",
            "MG Road, Bengaluru, Karnataka 560001",
            "Bengaluru",
            "karnataka",
            12.9756,
            77.6066,
            "logos/cauvery.svg",
            vec![
                position("Frontend Developer", "Full-time", "3-5 years", "₹18-25 LPA"),
                position("Engineering Manager", "Full-time", "8+ years", "₹45-60 LPA"),
            ],
        ),
        org(
            "Koramangala Labs",
            "80 Feet Road, Koramangala, Bengaluru, Karnataka 560034",
            "Bengaluru",
            "karnataka",
            12.9352,
            77.6245,
            "logos/koramangala.svg",
            vec![
                position("Full Stack Developer", "Full-time", "2-4 years", "₹12-18 LPA"),
                position("Data Engineer", "Full-time", "3-6 years", "₹20-30 LPA"),
                position("Summer Intern", "Internship", "Fresher", "₹35k/month"),
            ],
        ),
        org(
            "Whitefield Systems",
            "ITPL Main Road, Whitefield, Bengaluru, Karnataka 560066",
            "Bengaluru",
            "karnataka",
            12.9698,
            77.7500,
            "logos/whitefield.svg",
            vec![position("Embedded Engineer", "Full-time", "2-5 years", "₹10-16 LPA")],
        ),
        org(
            "Electronic City Devices",
            "Hosur Road, Electronic City, Bengaluru, Karnataka 560100",
            "Bengaluru",
            "karnataka",
            12.8452,
            77.6602,
            "logos/ecity.svg",
            vec![
                position("Firmware Developer", "Full-time", "3-5 years", "₹14-19 LPA"),
                position("Test Engineer", "Contract", "1-2 years", "₹6-8 LPA"),
            ],
        ),
        org(
            "Palace City Software",
            "Hebbal Industrial Area, Mysuru, Karnataka 570016",
            "Mysuru",
            "karnataka",
            12.3510,
            76.6133,
            "logos/palace-city.svg",
            vec![position("Java Developer", "Full-time", "2-4 years", "₹7-11 LPA")],
        ),
        org(
            "Coastal Fintech",
            "Bejai, Mangaluru, Karnataka 575004",
            "Mangaluru",
            "karnataka",
            12.8833,
            74.8436,
            "logos/coastal.svg",
            vec![
                position("Android Developer", "Full-time", "1-3 years", "₹6-9 LPA"),
                position("Business Analyst", "Full-time", "2-4 years", "₹7-10 LPA"),
            ],
        ),
    ])
}
