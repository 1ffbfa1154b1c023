use weather_core::WeatherView;

pub fn loading() {
    println!("Fetching weather...");
}

pub fn error(message: &str) {
    println!("! {message}");
}

pub fn weather(view: &WeatherView) {
    let time_of_day = if view.background.is_day { "day" } else { "night" };

    println!();
    println!("{}  [{} / {}]", view.name, view.background.condition, time_of_day);
    println!("  {}  {}", view.temperature, view.description);
    println!("  Feels like  {}", view.feels_like);
    println!("  Humidity    {}", view.humidity);
    println!("  Wind        {}", view.wind);
    println!("  Visibility  {}", view.visibility);
    println!("  Pressure    {}", view.pressure);
    println!("  Sunrise     {}", view.sunrise);
    println!("  Sunset      {}", view.sunset);
    if let Some(url) = &view.icon_url {
        println!("  Icon        {url}");
    }
    println!();
}
