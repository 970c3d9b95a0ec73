//! Dishes written into an empty catalog on first start

use shared::models::{MealCategory, MealDraft};

fn image(seed: &str) -> Option<String> {
    Some(format!("https://picsum.photos/seed/{seed}/400/300"))
}

#[allow(clippy::too_many_arguments)]
fn dish(
    id: &str,
    name: &str,
    description: &str,
    category: MealCategory,
    seed: &str,
    tags: &[&str],
    price: f64,
    weight: &str,
    ingredients: &[(&str, &str)],
) -> MealDraft {
    MealDraft {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        category,
        image: image(seed),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        price,
        weight: Some(weight.to_string()),
        ingredients: ingredients
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

pub fn default_menu() -> Vec<MealDraft> {
    use MealCategory::*;
    vec![
        dish(
            "b1",
            "Tapioca de Ovos e Queijo",
            "Tapioca crocante recheada com ovos mexidos cremosos e queijo branco.",
            Breakfast,
            "tap",
            &["Proteico", "Sem Glúten"],
            18.90,
            "250g",
            &[("Goma de tapioca", "80g"), ("Ovo", "2 un"), ("Queijo branco", "40g")],
        ),
        dish(
            "b2",
            "Omelete de Espinafre",
            "Omelete leve com espinafre fresco e ricota temperada.",
            Breakfast,
            "om",
            &["Low Carb", "Vegetariano"],
            16.50,
            "200g",
            &[("Ovo", "3 un"), ("Espinafre", "50g"), ("Ricota", "40g")],
        ),
        dish(
            "b3",
            "Panqueca de Banana",
            "Panquecas feitas com banana, aveia e um toque de mel.",
            Breakfast,
            "pan",
            &["Energético", "Saudável"],
            19.90,
            "220g",
            &[("Banana", "1 un"), ("Aveia", "40g"), ("Ovo", "1 un"), ("Mel", "10g")],
        ),
        dish(
            "s1",
            "Vitamina de Morango e Chia",
            "Mix refrescante de morangos selecionados, leite vegetal e sementes de chia.",
            Smoothie,
            "str",
            &["Fibras", "Detox"],
            14.90,
            "350ml",
            &[("Morango", "120g"), ("Leite vegetal", "200ml"), ("Chia", "10g")],
        ),
        dish(
            "s2",
            "Tropical Mango",
            "Manga madura batida com água de coco e um toque de gengibre.",
            Smoothie,
            "man",
            &["Imunidade", "Refrescante"],
            15.50,
            "350ml",
            &[("Manga", "150g"), ("Água de coco", "200ml"), ("Gengibre", "5g")],
        ),
        dish(
            "l1",
            "Frango Grelhado com Legumes",
            "Peito de frango marinado em ervas finas com mix de legumes ao vapor.",
            Lunch,
            "chi",
            &["Proteico", "Fitness"],
            28.90,
            "400g",
            &[("Peito de frango", "180g"), ("Brócolis", "80g"), ("Cenoura", "60g"), ("Ervas finas", "2g")],
        ),
        dish(
            "l2",
            "Salmão ao Molho de Maracujá",
            "Filé de salmão grelhado servido com arroz integral e purê de batata doce.",
            Lunch,
            "sal",
            &["Ômega 3", "Gourmet"],
            34.90,
            "380g",
            &[("Salmão", "150g"), ("Maracujá", "1 un"), ("Arroz integral", "90g"), ("Batata doce", "100g")],
        ),
        dish(
            "de1",
            "Mousse de Chocolate 70%",
            "Mousse aerada de chocolate amargo com nibs de cacau.",
            Dessert,
            "choc",
            &["Sem Açúcar", "Fit"],
            12.00,
            "100g",
            &[("Chocolate 70%", "40g"), ("Creme de leite", "50g"), ("Nibs de cacau", "5g")],
        ),
        dish(
            "de2",
            "Pudim de Chia com Coco",
            "Pudim de chia hidratado no leite de coco com calda de frutas vermelhas.",
            Dessert,
            "chia",
            &["Vegano", "Fibras"],
            11.50,
            "120g",
            &[("Chia", "20g"), ("Leite de coco", "90ml"), ("Frutas vermelhas", "30g")],
        ),
        dish(
            "d1",
            "Sopa de Abóbora Cabotiá",
            "Creme aveludado de abóbora com gengibre e sementes torradas.",
            Dinner,
            "soup",
            &["Leve", "Conforto"],
            22.50,
            "450ml",
            &[("Abóbora cabotiá", "300g"), ("Gengibre", "5g"), ("Sementes de abóbora", "10g")],
        ),
        dish(
            "d2",
            "Quiche de Alho Poró",
            "Massa integral crocante com recheio cremoso de alho poró.",
            Dinner,
            "quiche",
            &["Vegetariano"],
            24.90,
            "280g",
            &[("Farinha integral", "80g"), ("Alho poró", "100g"), ("Ovo", "2 un"), ("Creme de leite", "50g")],
        ),
    ]
}
