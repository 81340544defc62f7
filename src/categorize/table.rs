//! Category, keyword-weight and application-area tables.
//!
//! Category order is significant: equal scores resolve to the earlier entry.

use crate::record::InstallationComplexity::{self, Advanced, Basic, Intermediate};

#[derive(Debug)]
pub struct SubcategoryDef {
    pub name: &'static str,
    pub product_type: &'static str,
    pub keywords: &'static [&'static str],
    pub rag_keywords: &'static [&'static str],
    pub application_areas: &'static [&'static str],
    pub related_products: &'static [&'static str],
    pub typical_use_cases: &'static [&'static str],
    pub complexity: InstallationComplexity,
}

#[derive(Debug)]
pub struct CategoryDef {
    pub name: &'static str,
    /// Any hit adds the priority bonus once, ahead of generic material scoring.
    pub priority_keywords: &'static [&'static str],
    pub subcategories: &'static [SubcategoryDef],
}

pub const CATEGORIES: &[CategoryDef] = &[
    CategoryDef {
        name: "tiles",
        priority_keywords: &[],
        subcategories: &[
            SubcategoryDef {
                name: "porcelain_tile",
                product_type: "porcelain tile",
                keywords: &["porcelain", "porcelain tile", "rectified", "tile"],
                rag_keywords: &["porcelain tile", "through-body", "frost resistant"],
                application_areas: &["floor", "wall"],
                related_products: &["thinset mortar", "grout", "tile spacers", "leveling system"],
                typical_use_cases: &["high-traffic floors", "bathroom floors", "kitchen floors"],
                complexity: Intermediate,
            },
            SubcategoryDef {
                name: "ceramic_tile",
                product_type: "ceramic tile",
                keywords: &["ceramic", "ceramic tile", "glazed", "subway"],
                rag_keywords: &["ceramic tile", "subway tile", "glazed ceramic"],
                application_areas: &["wall", "backsplash"],
                related_products: &["tile adhesive", "unsanded grout", "edge trim"],
                typical_use_cases: &["kitchen backsplash", "bathroom walls", "accent walls"],
                complexity: Basic,
            },
            SubcategoryDef {
                name: "mosaic_tile",
                product_type: "mosaic tile",
                keywords: &["mosaic", "penny", "hexagon", "sheet", "mesh-mounted"],
                rag_keywords: &["mosaic tile", "penny tile", "hex mosaic"],
                application_areas: &["backsplash", "shower", "wall"],
                related_products: &["unsanded grout", "mosaic adhesive", "grout float"],
                typical_use_cases: &["shower floors", "backsplash accents", "niche inlays"],
                complexity: Intermediate,
            },
            SubcategoryDef {
                name: "glass_tile",
                product_type: "glass tile",
                keywords: &["glass tile", "glass", "iridescent"],
                rag_keywords: &["glass tile", "glass mosaic"],
                application_areas: &["backsplash", "wall", "pool"],
                related_products: &["white thinset", "unsanded grout", "glass tile cutter"],
                typical_use_cases: &["backsplash accents", "pool waterlines"],
                complexity: Advanced,
            },
        ],
    },
    CategoryDef {
        name: "natural_stone",
        priority_keywords: &[],
        subcategories: &[
            SubcategoryDef {
                name: "marble",
                product_type: "marble tile",
                keywords: &["marble", "carrara", "calacatta", "statuario"],
                rag_keywords: &["marble tile", "natural marble"],
                application_areas: &["floor", "wall", "bathroom"],
                related_products: &["stone sealer", "white thinset", "marble polish"],
                typical_use_cases: &["luxury bathrooms", "entryways", "feature walls"],
                complexity: Advanced,
            },
            SubcategoryDef {
                name: "travertine",
                product_type: "travertine tile",
                keywords: &["travertine", "tumbled"],
                rag_keywords: &["travertine tile", "travertine pavers"],
                application_areas: &["floor", "outdoor", "pool"],
                related_products: &["stone sealer", "sanded grout"],
                typical_use_cases: &["patios", "pool decks", "rustic floors"],
                complexity: Advanced,
            },
            SubcategoryDef {
                name: "slate",
                product_type: "slate tile",
                keywords: &["slate", "cleft"],
                rag_keywords: &["slate tile"],
                application_areas: &["floor", "outdoor"],
                related_products: &["stone enhancer", "sanded grout"],
                typical_use_cases: &["mudrooms", "patios"],
                complexity: Advanced,
            },
            SubcategoryDef {
                name: "granite_limestone",
                product_type: "stone tile",
                keywords: &["granite", "limestone", "quartzite", "natural stone", "stone"],
                rag_keywords: &["natural stone tile"],
                application_areas: &["floor", "countertop"],
                related_products: &["stone sealer", "stone cleaner"],
                typical_use_cases: &["countertops", "floors"],
                complexity: Advanced,
            },
        ],
    },
    CategoryDef {
        name: "grout",
        priority_keywords: &[],
        subcategories: &[
            SubcategoryDef {
                name: "sanded_grout",
                product_type: "sanded grout",
                keywords: &["sanded", "sanded grout", "grout"],
                rag_keywords: &["sanded grout", "wide joints"],
                application_areas: &["floor", "wall"],
                related_products: &["grout float", "grout sponge", "grout sealer"],
                typical_use_cases: &["joints 1/8 in and wider", "floor tile"],
                complexity: Basic,
            },
            SubcategoryDef {
                name: "unsanded_grout",
                product_type: "unsanded grout",
                keywords: &["unsanded", "non-sanded"],
                rag_keywords: &["unsanded grout", "narrow joints"],
                application_areas: &["wall", "backsplash"],
                related_products: &["grout float", "grout sponge"],
                typical_use_cases: &["joints under 1/8 in", "glass and polished stone"],
                complexity: Basic,
            },
            SubcategoryDef {
                name: "epoxy_grout",
                product_type: "epoxy grout",
                keywords: &["epoxy", "urethane", "stain proof"],
                rag_keywords: &["epoxy grout", "stain-proof grout"],
                application_areas: &["shower", "kitchen", "commercial"],
                related_products: &["epoxy grout float", "grout haze remover"],
                typical_use_cases: &["showers", "commercial kitchens"],
                complexity: Advanced,
            },
        ],
    },
    CategoryDef {
        name: "installation_materials",
        priority_keywords: &["sealer", "sealant", "caulk", "adhesive", "primer", "backer board", "substrate"],
        subcategories: &[
            SubcategoryDef {
                name: "thinset_mortar",
                product_type: "thinset mortar",
                keywords: &["thinset", "thin-set", "mortar", "modified", "large format"],
                rag_keywords: &["thinset mortar", "tile adhesive mortar"],
                application_areas: &["floor", "wall"],
                related_products: &["notched trowel", "mixing paddle", "bucket"],
                typical_use_cases: &["setting tile", "large format tile"],
                complexity: Intermediate,
            },
            SubcategoryDef {
                name: "backer_board",
                product_type: "backer board",
                keywords: &["backer board", "cement board", "goboard", "substrate", "underlayment"],
                rag_keywords: &["backer board", "tile substrate"],
                application_areas: &["shower", "wall", "floor"],
                related_products: &["backer board screws", "seam tape", "thinset mortar"],
                typical_use_cases: &["shower walls", "tub surrounds", "floor underlayment"],
                complexity: Intermediate,
            },
            SubcategoryDef {
                name: "waterproofing",
                product_type: "waterproofing membrane",
                keywords: &["membrane", "waterproofing", "redgard", "kerdi", "crack isolation"],
                rag_keywords: &["waterproof membrane", "shower waterproofing"],
                application_areas: &["shower", "bathroom"],
                related_products: &["seam tape", "paint roller", "backer board"],
                typical_use_cases: &["shower pans", "wet areas"],
                complexity: Intermediate,
            },
            SubcategoryDef {
                name: "adhesives_sealants",
                product_type: "adhesive",
                keywords: &["adhesive", "sealant", "caulk", "primer", "sealer", "mastic"],
                rag_keywords: &["tile adhesive", "caulk"],
                application_areas: &["wall", "kitchen", "bathroom"],
                related_products: &["caulk gun", "painter's tape"],
                typical_use_cases: &["change-of-plane joints", "wall tile"],
                complexity: Basic,
            },
        ],
    },
    CategoryDef {
        name: "trim_molding",
        priority_keywords: &[],
        subcategories: &[
            SubcategoryDef {
                name: "tile_trim",
                product_type: "tile edge trim",
                keywords: &["trim", "edge trim", "schluter", "bullnose", "pencil", "jolly", "profile"],
                rag_keywords: &["tile edge", "metal trim"],
                application_areas: &["wall", "backsplash", "shower"],
                related_products: &["thinset mortar", "tile"],
                typical_use_cases: &["finishing exposed tile edges", "outside corners"],
                complexity: Intermediate,
            },
            SubcategoryDef {
                name: "molding",
                product_type: "molding",
                keywords: &["molding", "moulding", "quarter round", "baseboard", "stair nose", "t-molding", "reducer", "threshold"],
                rag_keywords: &["floor transition", "quarter round"],
                application_areas: &["floor"],
                related_products: &["construction adhesive", "finish nails"],
                typical_use_cases: &["floor transitions", "stair edges"],
                complexity: Basic,
            },
        ],
    },
    CategoryDef {
        name: "flooring",
        priority_keywords: &[],
        subcategories: &[
            SubcategoryDef {
                name: "luxury_vinyl",
                product_type: "luxury vinyl plank",
                keywords: &["vinyl", "luxury vinyl", "lvp", "spc", "wpc", "rigid core", "plank", "wear layer"],
                rag_keywords: &["luxury vinyl plank", "waterproof flooring"],
                application_areas: &["floor", "kitchen", "bathroom"],
                related_products: &["underlayment", "t-molding", "quarter round"],
                typical_use_cases: &["whole-home floors", "basements"],
                complexity: Basic,
            },
            SubcategoryDef {
                name: "laminate",
                product_type: "laminate flooring",
                keywords: &["laminate"],
                rag_keywords: &["laminate flooring"],
                application_areas: &["floor"],
                related_products: &["underlayment", "transition strips"],
                typical_use_cases: &["living areas", "bedrooms"],
                complexity: Basic,
            },
            SubcategoryDef {
                name: "wood",
                product_type: "wood flooring",
                keywords: &["hardwood", "engineered wood", "engineered hardwood", "oak"],
                rag_keywords: &["hardwood flooring"],
                application_areas: &["floor"],
                related_products: &["wood adhesive", "moisture barrier"],
                typical_use_cases: &["living areas", "bedrooms"],
                complexity: Intermediate,
            },
        ],
    },
    CategoryDef {
        name: "tools",
        priority_keywords: &[
            "sponge", "trowel", "cutter", "saw", "float", "bucket", "mixing", "screw", "fastener",
            "hardware", "washer", "bolt", "clip", "spacer",
        ],
        subcategories: &[
            SubcategoryDef {
                name: "cutting_tools",
                product_type: "tile cutting tool",
                keywords: &["cutter", "saw", "wet saw", "blade", "nippers", "scoring"],
                rag_keywords: &["tile cutter", "wet saw"],
                application_areas: &[],
                related_products: &["diamond blade", "safety glasses"],
                typical_use_cases: &["cutting tile", "notching tile"],
                complexity: Intermediate,
            },
            SubcategoryDef {
                name: "installation_tools",
                product_type: "installation tool",
                keywords: &["trowel", "float", "sponge", "bucket", "mixing", "paddle", "spacer", "leveling", "knee pads"],
                rag_keywords: &["tile tools", "notched trowel", "grout sponge"],
                application_areas: &[],
                related_products: &["thinset mortar", "grout"],
                typical_use_cases: &["spreading mortar", "grouting", "cleanup"],
                complexity: Basic,
            },
            SubcategoryDef {
                name: "hardware",
                product_type: "fastener",
                keywords: &["screw", "fastener", "hardware", "washer", "bolt", "clip", "bracket", "anchor"],
                rag_keywords: &["backer board screws", "fasteners"],
                application_areas: &[],
                related_products: &["backer board", "drill"],
                typical_use_cases: &["fastening backer board", "mounting accessories"],
                complexity: Basic,
            },
        ],
    },
    CategoryDef {
        name: "care_maintenance",
        priority_keywords: &["cleaner", "polish", "enhancer", "restoration"],
        subcategories: &[
            SubcategoryDef {
                name: "cleaners",
                product_type: "tile cleaner",
                keywords: &["cleaner", "cleaning", "haze remover", "degreaser"],
                rag_keywords: &["tile cleaner", "grout cleaner"],
                application_areas: &["floor", "wall"],
                related_products: &["grout sealer", "microfiber mop"],
                typical_use_cases: &["routine cleaning", "post-install haze removal"],
                complexity: Basic,
            },
            SubcategoryDef {
                name: "sealers",
                product_type: "stone sealer",
                keywords: &["sealer", "impregnator", "penetrating", "grout sealer"],
                rag_keywords: &["stone sealer", "grout sealer"],
                application_areas: &["floor", "countertop", "shower"],
                related_products: &["stone cleaner", "applicator pad"],
                typical_use_cases: &["protecting natural stone", "sealing grout lines"],
                complexity: Basic,
            },
            SubcategoryDef {
                name: "polish_restoration",
                product_type: "stone polish",
                keywords: &["polish", "enhancer", "restoration", "restorer"],
                rag_keywords: &["marble polish", "color enhancer"],
                application_areas: &["floor", "countertop"],
                related_products: &["stone sealer", "buffing pad"],
                typical_use_cases: &["restoring shine", "deepening stone color"],
                complexity: Intermediate,
            },
        ],
    },
];

/// Per-keyword weights; structural terms outrank generic ones.
pub const KEYWORD_WEIGHTS: &[(&str, f64)] = &[
    ("thinset", 0.9),
    ("thin-set", 0.9),
    ("backer board", 0.9),
    ("goboard", 0.9),
    ("trowel", 0.9),
    ("sponge", 0.9),
    ("grout", 0.85),
    ("sealer", 0.85),
    ("cleaner", 0.85),
    ("mortar", 0.8),
    ("membrane", 0.8),
    ("porcelain", 0.8),
    ("mosaic", 0.8),
    ("laminate", 0.8),
    ("molding", 0.8),
    ("luxury vinyl", 0.85),
    ("travertine", 0.8),
    ("slate", 0.75),
    ("marble", 0.7),
    ("vinyl", 0.7),
    ("trim", 0.7),
    ("epoxy", 0.7),
    ("ceramic", 0.6),
    ("glass", 0.5),
    ("stone", 0.45),
    ("tile", 0.4),
    ("plank", 0.4),
    ("sheet", 0.3),
    ("profile", 0.3),
];

pub fn keyword_weight(keyword: &str, default: f64) -> f64 {
    KEYWORD_WEIGHTS
        .iter()
        .find(|(k, _)| *k == keyword)
        .map_or(default, |(_, w)| *w)
}

/// Application areas in output order, with the terms that signal each.
pub const APPLICATION_AREAS: &[(&str, &[&str])] = &[
    ("floor", &["floor", "flooring"]),
    ("wall", &["wall"]),
    ("backsplash", &["backsplash"]),
    ("shower", &["shower"]),
    ("bathroom", &["bathroom", "bath"]),
    ("kitchen", &["kitchen"]),
    ("outdoor", &["outdoor", "exterior", "patio"]),
    ("pool", &["pool"]),
    ("fireplace", &["fireplace"]),
    ("countertop", &["countertop", "vanity top"]),
    ("commercial", &["commercial"]),
];
