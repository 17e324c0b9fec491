// src/seed.rs
use crate::domain::{LeadStatus, NewLead};

struct SampleLead {
    name: &'static str,
    phone: &'static str,
    email: Option<&'static str>,
    address: &'static str,
    city: &'static str,
    status: LeadStatus,
    source: &'static str,
    notes: &'static str,
}

const SAMPLES: &[SampleLead] = &[
    SampleLead {
        name: "Rachel Lindqvist",
        phone: "(801) 555-0142",
        email: Some("rlindqvist@gmail.com"),
        address: "2145 E Kensington Ave",
        city: "Salt Lake City",
        status: LeadStatus::New,
        source: "Door Knock",
        notes: "Wind damage on the north slope. Wants a repair estimate.",
    },
    SampleLead {
        name: "Dale Okafor",
        phone: "(801) 555-0187",
        email: Some("dokafor@yahoo.com"),
        address: "788 N 400 W",
        city: "Bountiful",
        status: LeadStatus::Contacted,
        source: "Facebook",
        notes: "Left voicemail. Try again after 5pm.",
    },
    SampleLead {
        name: "Gary & Lynn Petersen",
        phone: "(385) 555-0113",
        email: None,
        address: "1320 S Canyon Rd",
        city: "Provo",
        status: LeadStatus::Quoted,
        source: "Referral",
        notes: "Quoted $16,400 for a full tear-off.",
    },
    SampleLead {
        name: "Marisol Vega",
        phone: "(801) 555-0166",
        email: Some("mvega@outlook.com"),
        address: "455 E 2700 N",
        city: "Ogden",
        status: LeadStatus::Won,
        source: "Google",
        notes: "Signed. Crew scheduled for the first week of the month.",
    },
    SampleLead {
        name: "Owen Brackett",
        phone: "(801) 555-0120",
        email: Some("obrackett@icloud.com"),
        address: "96 W Center St",
        city: "Orem",
        status: LeadStatus::Lost,
        source: "Website",
        notes: "Went with a cheaper bid.",
    },
    SampleLead {
        name: "Tessa Hurd",
        phone: "(385) 555-0199",
        email: None,
        address: "3911 S Highland Dr",
        city: "Millcreek",
        status: LeadStatus::New,
        source: "Yard Sign",
        notes: "Saw the sign on Highland. Leak over the garage.",
    },
    SampleLead {
        name: "Ken Nakamura",
        phone: "(801) 555-0151",
        email: Some("knakamura@gmail.com"),
        address: "615 W 1200 S",
        city: "Layton",
        status: LeadStatus::Contacted,
        source: "Referral",
        notes: "Neighbor of the Vega job. Interested in a replacement.",
    },
    SampleLead {
        name: "Priya Raman",
        phone: "(801) 555-0175",
        email: Some("praman@me.com"),
        address: "2280 E Fort Union Blvd",
        city: "Cottonwood Heights",
        status: LeadStatus::Quoted,
        source: "Door Knock",
        notes: "Quoted $11,300. Waiting on the insurance adjuster.",
    },
];

/// Demo leads for `leadledger seed`.
pub fn sample_leads() -> Vec<NewLead> {
    SAMPLES
        .iter()
        .map(|s| NewLead {
            name: s.name.to_string(),
            phone: Some(s.phone.to_string()),
            email: s.email.map(str::to_string),
            address: Some(s.address.to_string()),
            city: Some(s.city.to_string()),
            status: Some(s.status),
            source: Some(s.source.to_string()),
            notes: Some(s.notes.to_string()),
            lat: None,
            lng: None,
        })
        .collect()
}
