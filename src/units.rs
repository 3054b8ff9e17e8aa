/// Screen pixels per centimeter (96 DPI)
pub const PIXELS_PER_CM: f64 = 37.795_275_590_6;

/// Newtons per kilogram-force
pub const NEWTONS_PER_KGF: f64 = 9.806_65;

/// Converts a length in centimeters to pixels
pub fn pixels_from_cm(cm: f64) -> f64 {
    cm * PIXELS_PER_CM
}

/// Converts a length in pixels to centimeters
pub fn cm_from_pixels(px: f64) -> f64 {
    px / PIXELS_PER_CM
}

/// Converts a torque in kgF·cm to N·cm
pub fn ncm_from_kgfcm(kgfcm: f64) -> f64 {
    kgfcm * NEWTONS_PER_KGF
}

/// Converts a torque in N·cm to kgF·cm
pub fn kgfcm_from_ncm(ncm: f64) -> f64 {
    ncm / NEWTONS_PER_KGF
}
