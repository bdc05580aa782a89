//! Prompts sent to image and video models, plus the caption prompt for reels.
//! Media prompts are always English; only user-facing text (captions, image
//! descriptions) follows the request language.

use serde::Serialize;

use super::{Brief, Language, PromptPair, json_system};

pub fn image_style(style: &str) -> &'static str {
    match style.trim().to_lowercase().as_str() {
        "professional" | "studio" => {
            "clean professional studio product photography, seamless white backdrop, softbox lighting, sharp focus, high detail"
        }
        "lifestyle" => {
            "lifestyle photography, product in a real home setting, natural window light, warm tones, shallow depth of field"
        }
        "minimal" | "minimalist" => {
            "minimalist composition, pastel solid background, soft shadows, lots of negative space"
        }
        "luxury" => {
            "luxury editorial look, dark marble surface, gold accents, dramatic rim lighting, glossy reflections"
        }
        "creative" | "artistic" => {
            "bold creative concept, surreal floating elements, vibrant colors, dynamic composition"
        }
        "flat-lay" | "flatlay" => {
            "top-down flat lay, neatly arranged props, even diffused light, social-media ready"
        }
        _ => "high quality commercial product photography, balanced lighting, crisp detail",
    }
}

/// Text prompt for an image model. With a reference image the model is asked
/// to keep the product unchanged and only restage it. The short description
/// returned next to the image follows `lang`.
pub fn image_prompt(prompt: &str, style: &str, has_reference: bool, lang: Language) -> String {
    let base = if has_reference {
        format!(
            "Using the provided product photo, keep the product exactly as it is (shape, color, label, proportions) and place it in a new scene: {}.",
            prompt.trim()
        )
    } else {
        format!("Create a product photo: {}.", prompt.trim())
    };
    format!(
        "{} Style: {}. No text, no watermarks, no logos other than the product's own. Also describe the finished image in one sentence. {}",
        base,
        image_style(style),
        lang.instruction()
    )
}

pub fn reel_motion(style: &str) -> &'static str {
    match style.trim().to_lowercase().as_str() {
        "dynamic" | "energetic" => "fast dynamic camera orbit, quick push-in, energetic motion",
        "elegant" | "luxury" => "slow elegant dolly around the product, soft light sweeps, graceful motion",
        "playful" | "fun" => "playful bouncy motion, product pops into frame, colorful light",
        "cinematic" => "cinematic slow push-in, shallow depth of field, moody lighting, film look",
        _ => "smooth slow camera movement around the product, gentle lighting change",
    }
}

pub fn reel_video_prompt(product_name: &str, style: &str) -> String {
    format!(
        "Vertical 9:16 product showcase video of {}. {}. Keep the product identical to the input image, no text overlays.",
        product_name.trim(),
        reel_motion(style)
    )
}

const CAPTION_SHAPE: &str = r##"{"caption":"...","hashtags":["#..."]}"##;

pub fn reel_caption(product_name: &str, style: &str, lang: Language) -> PromptPair {
    PromptPair {
        system: json_system(
            "You write short, catchy captions for Instagram Reels and TikTok product videos.",
            lang,
            CAPTION_SHAPE,
        ),
        user: Brief::default()
            .line("Product", Some(product_name))
            .line("Video style", Some(style))
            .text("Write one caption under 150 characters with emojis, and 8 to 12 relevant hashtags.")
            .finish(),
    }
}

/// One shot in a UGC set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UgcScene {
    pub kind: &'static str,
    pub kind_ar: &'static str,
    pub scene: &'static str,
    pub scene_ar: &'static str,
    /// Visual direction for the image model; `{product}` is substituted.
    pub direction: &'static str,
}

impl UgcScene {
    pub fn image_prompt(&self, product_name: &str) -> String {
        format!(
            "Authentic smartphone photo, UGC style, {}. Natural imperfect lighting, candid, vertical 9:16, looks filmed by a real customer, not an ad.",
            self.direction.replace("{product}", product_name.trim())
        )
    }

    pub fn video_prompt(&self, product_name: &str) -> String {
        format!(
            "Handheld phone footage, UGC style: {}. Subtle natural camera shake, realistic movement, 9:16.",
            self.direction.replace("{product}", product_name.trim())
        )
    }

    pub fn label(&self, lang: Language) -> &'static str {
        lang.pick(self.kind_ar, self.kind)
    }

    pub fn description(&self, lang: Language) -> &'static str {
        lang.pick(self.scene_ar, self.scene)
    }
}

const TESTIMONIAL: UgcScene = UgcScene {
    kind: "Testimonial",
    kind_ar: "شهادة عميل",
    scene: "Customer talking to camera about why they love the product",
    scene_ar: "عميل يتحدث للكاميرا عن سبب حبه للمنتج",
    direction: "a smiling person in their living room holding {product} up to the camera while talking",
};

const UNBOXING: UgcScene = UgcScene {
    kind: "Unboxing",
    kind_ar: "فتح الصندوق",
    scene: "Hands opening the package and revealing the product",
    scene_ar: "أيدي تفتح الطرد وتكشف عن المنتج",
    direction: "hands opening a delivery box on a bed and lifting out {product}",
};

const TUTORIAL: UgcScene = UgcScene {
    kind: "How-to",
    kind_ar: "طريقة الاستخدام",
    scene: "Step-by-step demonstration of using the product",
    scene_ar: "شرح خطوة بخطوة لاستخدام المنتج",
    direction: "close-up of hands demonstrating how to use {product} on a kitchen counter",
};

const LIFESTYLE: UgcScene = UgcScene {
    kind: "Lifestyle",
    kind_ar: "أسلوب حياة",
    scene: "The product used naturally in everyday life",
    scene_ar: "المنتج في الحياة اليومية بشكل طبيعي",
    direction: "a person casually using {product} at a cafe table in daylight",
};

const REVIEW: UgcScene = UgcScene {
    kind: "Review",
    kind_ar: "مراجعة",
    scene: "Honest before-and-after style review",
    scene_ar: "مراجعة صادقة قبل وبعد",
    direction: "a mirror selfie of a person showing {product} with an impressed expression",
};

const SELFIE: UgcScene = UgcScene {
    kind: "Selfie",
    kind_ar: "سيلفي",
    scene: "Front-camera selfie video featuring the product",
    scene_ar: "فيديو سيلفي بالكاميرا الأمامية مع المنتج",
    direction: "front-camera selfie of a young person holding {product} next to their face",
};

/// Scenes for a UGC type, in generation order. Unknown types get a mixed set.
pub fn ugc_scenes(ugc_type: &str) -> Vec<UgcScene> {
    match ugc_type.trim().to_lowercase().as_str() {
        "testimonial" => vec![TESTIMONIAL, SELFIE, REVIEW, LIFESTYLE],
        "unboxing" => vec![UNBOXING, SELFIE, REVIEW, TESTIMONIAL],
        "tutorial" | "howto" | "how-to" => vec![TUTORIAL, UNBOXING, LIFESTYLE, REVIEW],
        "lifestyle" => vec![LIFESTYLE, SELFIE, TESTIMONIAL, TUTORIAL],
        "review" => vec![REVIEW, UNBOXING, TESTIMONIAL, SELFIE],
        _ => vec![TESTIMONIAL, UNBOXING, TUTORIAL, LIFESTYLE],
    }
}

pub fn ugc_tips(ugc_type: &str, lang: Language) -> Vec<String> {
    let mut tips: Vec<&str> = vec![
        lang.pick(
            "انشر الفيديو بصيغة عمودية 9:16 للحصول على أفضل وصول",
            "Post vertically (9:16) for the best reach",
        ),
        lang.pick(
            "اجذب الانتباه في أول ثانيتين",
            "Hook viewers in the first two seconds",
        ),
    ];
    match ugc_type.trim().to_lowercase().as_str() {
        "testimonial" | "review" => tips.push(lang.pick(
            "أضف نص تقييم العميل على الشاشة لزيادة الثقة",
            "Overlay the customer's rating on screen to build trust",
        )),
        "unboxing" => tips.push(lang.pick(
            "استخدم صوت فتح الصندوق الطبيعي بدون موسيقى صاخبة",
            "Keep the natural unboxing sounds and skip loud music",
        )),
        "tutorial" | "howto" | "how-to" => tips.push(lang.pick(
            "اعرض النتيجة النهائية أولاً ثم الخطوات",
            "Show the end result first, then the steps",
        )),
        _ => tips.push(lang.pick(
            "استخدم الفيديوهات كإعلانات Spark على تيك توك",
            "Run the clips as TikTok Spark Ads",
        )),
    }
    tips.into_iter().map(str::to_string).collect()
}
